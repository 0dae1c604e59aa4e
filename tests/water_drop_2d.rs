//! A 2D water drop falling into a basin, scaled down for test runtime,
//! stays within the container and never departs from a physically
//! plausible density range.

use sph_fluid_sim::geometry::{BoundingBox, Dimension, Transform, Vector3};
use sph_fluid_sim::rng::ChaChaRandomSource;
use sph_fluid_sim::surfaces::{BoxShape, Plane, Sphere, Surface, SurfaceKind};
use sph_fluid_sim::{Frame, ImplicitSurfaceSet, RigidBodyCollider, SphParameters, SphSolver, VolumeParticleEmitter};

#[test]
fn water_drop_stays_inside_container_with_bounded_density() {
    let target_density = 1000.0;
    let spacing = 0.05;
    let domain = BoundingBox::new(Vector3::ZERO, Vector3::new(1.0, 2.0, 0.0)).unwrap();

    let mut source = ImplicitSurfaceSet::new();
    source.add(Surface::new(
        Transform::from_translation(Vector3::new(0.0, 0.5, 0.0)),
        SurfaceKind::Plane(Plane::new(Vector3::new(0.0, 1.0, 0.0))),
    ));
    source.add(Surface::new(
        Transform::from_translation(Vector3::new(0.5, 1.0, 0.0)),
        SurfaceKind::Sphere(Sphere::new(0.15)),
    ));

    let container = Surface::new(
        Transform::identity(),
        SurfaceKind::Box(BoxShape::new(domain, Dimension::Two).unwrap()),
    )
    .with_normal_flipped(true);

    let emitter = VolumeParticleEmitter::new(source, domain, spacing).unwrap().with_max_number_of_particles(5000);

    let mut solver = SphSolver::new(Dimension::Two, target_density, spacing)
        .unwrap()
        .with_emitter(emitter)
        .with_collider(RigidBodyCollider::new(container))
        .with_params(SphParameters {
            viscosity_coefficient: 0.05,
            pseudo_viscosity_coefficient: 5.0,
            ..SphParameters::default()
        });

    let mut rng = ChaChaRandomSource::new(1234);
    let radius = solver.data().radius();

    for frame_index in 0..20u64 {
        solver.on_update(Frame::new(frame_index, 1.0 / 60.0), &mut rng);

        if frame_index == 0 {
            assert!(solver.data().len() > 0, "emitter should have seeded particles on frame 0");
        }

        for &p in solver.data().positions() {
            assert!(p.x.is_finite() && p.y.is_finite(), "position must never be NaN/infinite");
            assert!(p.y >= -radius - 1e-4, "particle escaped below the container floor: {p:?}");
        }
        assert!(
            solver.max_density() <= 1.1 * target_density,
            "max density {} exceeded 1.1x target on frame {frame_index}",
            solver.max_density()
        );
    }
}
