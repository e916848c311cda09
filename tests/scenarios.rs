use std::collections::HashMap;

use approx::assert_abs_diff_eq;
use marching_isosurface::{
    Field, FnField, GridConfig, IsoSurfaceError, IsoSurfaceGenerator, MaterialDescriptor, Point,
    ScalarField, Triangle,
    fields::{Sphere, Torus},
    march,
    utils::bounding_box,
};

type VertexKey = [u64; 3];

fn key(p: &Point) -> VertexKey {
    [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()]
}

fn is_degenerate(face: &Triangle) -> bool {
    let [a, b, c] = face.map(|p| key(&p));
    a == b || b == c || a == c
}

/// Directed edge counts over the non-degenerate faces, with vertices welded by exact bit pattern.
fn directed_edges(faces: &[Triangle]) -> HashMap<(VertexKey, VertexKey), usize> {
    let mut edges = HashMap::new();
    for face in faces.iter().filter(|f| !is_degenerate(f)) {
        for (a, b) in [(0, 1), (1, 2), (2, 0)] {
            *edges.entry((key(&face[a]), key(&face[b]))).or_default() += 1;
        }
    }
    edges
}

#[test]
fn unit_sphere_vertices_lie_near_the_surface() {
    let config = GridConfig::new(4.0, 0.5);
    let mut generator = IsoSurfaceGenerator::new(Sphere::new(1.0), config);
    generator.generate_mesh().unwrap();

    let faces = generator.faces();
    assert!(!faces.is_empty());
    for vertex in faces.iter().flatten() {
        let error = (vertex.coords.norm_squared() - 1.0).abs();
        assert!(error <= 0.5 * config.step_size, "{vertex} is {error} off the sphere");
    }
}

#[test]
fn constant_field_produces_no_faces() {
    let field = FnField::new(0.0, |_: &Point| 1.0);
    let mut generator = IsoSurfaceGenerator::new(field, GridConfig::new(4.0, 0.5));
    generator.generate_mesh().unwrap();
    assert!(generator.faces().is_empty());
    assert_eq!(bounding_box(generator.faces()), None);
}

#[test]
fn field_entirely_inside_produces_no_faces() {
    let field = FnField::new(0.0, |_: &Point| -1.0);
    assert!(march(&field, &GridConfig::new(2.0, 0.5)).unwrap().is_empty());
}

#[test]
fn torus_spans_its_analytic_extent() {
    let step = 0.25;
    let faces = march(&Torus::default(), &GridConfig::new(8.0, step)).unwrap();
    let [min, max] = bounding_box(&faces).unwrap();

    for (lo, hi, expected) in [(min.x, max.x, 3.0), (min.y, max.y, 3.0), (min.z, max.z, 1.0)] {
        assert_abs_diff_eq!(lo, -expected, epsilon = step);
        assert_abs_diff_eq!(hi, expected, epsilon = step);
    }
}

#[test]
fn torus_mesh_is_closed_and_consistently_wound() {
    let faces = march(&Torus::default(), &GridConfig::new(8.0, 0.25)).unwrap();
    let edges = directed_edges(&faces);
    assert!(!edges.is_empty());

    for (&(a, b), &count) in &edges {
        assert_eq!(count, 1, "edge walked twice in the same direction");
        assert_eq!(
            edges.get(&(b, a)),
            Some(&1),
            "edge without an opposite twin: the mesh has a hole or a flipped face"
        );
    }
}

#[test]
fn sphere_faces_all_wind_the_same_way() {
    let faces = march(&Sphere::new(1.0), &GridConfig::new(4.0, 0.5)).unwrap();
    let orientations: Vec<bool> = faces
        .iter()
        .filter_map(|[a, b, c]| {
            let normal = (b - a).cross(&(c - a));
            let centroid = (a.coords + b.coords + c.coords) / 3.0;
            (normal.norm() > 1e-12).then(|| normal.dot(&centroid) > 0.0)
        })
        .collect();

    assert!(!orientations.is_empty());
    assert!(orientations.iter().all(|&o| o == orientations[0]));
}

#[test]
fn generation_is_deterministic() {
    let config = GridConfig::new(4.0, 0.25);
    for name in ["torus", "mandelbox", "planet"] {
        let field: Field = name.parse().unwrap();
        let first = march(&field, &config).unwrap();
        let second = march(&field, &config).unwrap();
        assert_eq!(first, second, "{name} meshed differently twice");
    }
}

#[test]
fn invalid_grids_are_reported() {
    let sphere = Sphere::default();
    assert_eq!(
        march(&sphere, &GridConfig::new(4.0, 0.0)),
        Err(IsoSurfaceError::InvalidStepSize { step_size: 0.0 })
    );
    assert_eq!(
        march(&sphere, &GridConfig::new(-2.0, 0.5)),
        Err(IsoSurfaceError::InvalidGridSize { grid_size: -2.0 })
    );
    assert!(march(&sphere, &GridConfig::new(f64::NAN, 0.5)).is_err());
    assert!(march(&sphere, &GridConfig::new(4.0, -0.1)).is_err());

    let mut generator = IsoSurfaceGenerator::new(sphere, GridConfig::new(4.0, f64::INFINITY));
    assert!(generator.generate_mesh().is_err());
    assert!(generator.faces().is_empty());
}

#[test]
fn oversized_grids_are_rejected_before_sampling() {
    let calls = std::sync::atomic::AtomicUsize::new(0);
    let field = FnField::new(0.0, |p: &Point| {
        calls.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        p.coords.norm() - 1.0
    });

    for config in [GridConfig::new(1.0e20, 1.0), GridConfig::new(1.0e6, 1.0e-3)] {
        let mut generator = IsoSurfaceGenerator::new(&field, config);
        assert_eq!(
            generator.generate_mesh(),
            Err(IsoSurfaceError::GridTooLarge {
                grid_size: config.grid_size,
                step_size: config.step_size
            })
        );
        assert!(generator.faces().is_empty());
    }
    assert_eq!(calls.load(std::sync::atomic::Ordering::Relaxed), 0);
}

#[test]
fn every_built_in_field_meshes_on_a_coarse_grid() {
    let config = GridConfig::new(4.0, 0.25);
    for name in Field::NAMES {
        let field: Field = name.parse().unwrap();
        let faces = march(&field, &config).unwrap();
        for vertex in faces.iter().flatten() {
            assert!(
                vertex.coords.iter().all(|c| c.is_finite()),
                "{name} produced a non-finite vertex"
            );
        }
    }
}

#[test]
fn noisy_fields_produce_surfaces() {
    let config = GridConfig::new(4.0, 0.25);
    for name in ["planet", "simple_noise_terrain", "complex_terrain"] {
        let field: Field = name.parse().unwrap();
        assert!(!march(&field, &config).unwrap().is_empty(), "{name} has no surface");
        assert_eq!(field.material_descriptor(), MaterialDescriptor::HeightMap);
    }
}

#[test]
fn generator_reports_the_field_material() {
    let generator = IsoSurfaceGenerator::new(Field::from(Sphere::default()), GridConfig::default());
    assert_eq!(
        generator.material_descriptor(),
        MaterialDescriptor::smooth([0.0, 0.0, 0.0, 1.0])
    );

    let generator = IsoSurfaceGenerator::new("mandelbulb".parse::<Field>().unwrap(), GridConfig::default());
    assert_eq!(generator.material_descriptor(), MaterialDescriptor::fractal());
}

#[test]
fn changing_the_step_refines_the_mesh() {
    let mut generator = IsoSurfaceGenerator::new(Sphere::new(1.0), GridConfig::new(4.0, 0.5));
    generator.generate_mesh().unwrap();
    let coarse = generator.faces().len();

    generator.set_config(generator.config().with_step_size(0.25));
    generator.generate_mesh().unwrap();
    assert!(generator.faces().len() > coarse);
    assert_eq!(generator.into_faces().len(), march(&Sphere::new(1.0), &GridConfig::new(4.0, 0.25)).unwrap().len());
}
