use criterion::{criterion_group, criterion_main, Criterion};
use sph_fluid_sim::geometry::{BoundingBox, Dimension, Transform, Vector3};
use sph_fluid_sim::rng::ChaChaRandomSource;
use sph_fluid_sim::surfaces::{Plane, Sphere, Surface, SurfaceKind};
use sph_fluid_sim::{ImplicitSurfaceSet, ParticleStore, VolumeParticleEmitter};

fn water_drop_source() -> ImplicitSurfaceSet {
    let mut set = ImplicitSurfaceSet::new();
    set.add(Surface::new(
        Transform::identity(),
        SurfaceKind::Plane(Plane::new(Vector3::new(0.0, 1.0, 0.0))),
    ));
    set.add(Surface::new(
        Transform::from_translation(Vector3::new(0.5, 1.0, 0.5)),
        SurfaceKind::Sphere(Sphere::new(0.15)),
    ));
    set
}

fn bench_emit_one_shot(c: &mut Criterion) {
    let domain = BoundingBox::new(Vector3::ZERO, Vector3::new(1.0, 2.0, 1.0)).unwrap();
    c.bench_function("emit_one_shot_water_drop", |b| {
        b.iter(|| {
            let mut emitter = VolumeParticleEmitter::new(water_drop_source(), domain, 0.02)
                .unwrap()
                .with_max_number_of_particles(60_000);
            let mut store = ParticleStore::new(0.02, 1.0);
            let mut rng = ChaChaRandomSource::new(0);
            emitter.update(Dimension::Three, &mut store, &mut rng);
            store
        })
    });
}

criterion_group!(benches, bench_emit_one_shot);
criterion_main!(benches);
