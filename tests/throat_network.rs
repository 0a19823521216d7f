#![allow(clippy::unwrap_used)]

use approx::assert_relative_eq;
use porefacet::math::Point3;
use porefacet::{
    ErosionError, ErosionParams, FacetErosion, OcclusionPruning, PoreNetwork, ReferenceAxis,
    ThroatErosion,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Four 10 x 10 x 10 box pores in a 2 x 2 grid. The four face-sharing
/// neighbours are connected, plus one diagonal throat whose pores only share
/// an edge.
fn grid_network() -> PoreNetwork {
    let mut coords = Vec::new();
    let mut vertices = Vec::new();
    for j in 0..2 {
        for i in 0..2 {
            let (x0, y0) = (f64::from(i) * 10.0, f64::from(j) * 10.0);
            coords.push(Point3::new(x0 + 5.0, y0 + 5.0, 5.0));
            let mut corners = Vec::new();
            for x in [x0, x0 + 10.0] {
                for y in [y0, y0 + 10.0] {
                    for z in [0.0, 10.0] {
                        corners.push(Point3::new(x, y, z));
                    }
                }
            }
            vertices.push(corners);
        }
    }
    PoreNetwork::new(
        coords,
        vertices,
        vec![[0, 1], [0, 2], [1, 3], [2, 3], [0, 3]],
    )
    .unwrap()
}

#[test]
fn grid_throats_erode_and_diagonal_is_pruned() {
    init_tracing();
    let mut network = grid_network();
    let report = ThroatErosion::new(ErosionParams::new(2.0))
        .execute(&mut network)
        .unwrap();

    assert_eq!(report.throats, 5);
    assert_eq!(report.eroded, 4);
    assert_eq!(report.failure_count(ErosionError::TooFewVertices), 1);
    assert_eq!(report.failures_by_code().get(&1), Some(&1));
    assert_eq!(report.pruned, vec![4]);

    assert_eq!(network.num_throats(), 4);
    assert_eq!(network.num_pores(), 4);
    let geometry = network.throat_geometry().unwrap();
    for t in 0..4 {
        assert_relative_eq!(geometry.area[t], 36.0, epsilon = 1e-9);
        assert_relative_eq!(geometry.perimeter[t], 24.0, epsilon = 1e-9);
        assert_eq!(geometry.shared_vertices[t].len(), 4);
        assert_eq!(geometry.error_code(t), 0);
    }
}

#[test]
fn batch_matches_single_facet_erosion() {
    init_tracing();
    let network = grid_network();
    let params = ErosionParams::new(3.0);
    let geometry = ThroatErosion::new(params).erode(&network).unwrap();

    for t in 0..network.num_throats() {
        let shared = network.shared_vertices(t).unwrap();
        let normal = network.throat_normal(t).unwrap();
        let single = if shared.len() < 3 {
            Err(ErosionError::TooFewVertices)
        } else {
            FacetErosion::new(&shared, normal, params).execute()
        };
        match single {
            Ok(facet) => {
                assert_relative_eq!(geometry.area[t], facet.area, epsilon = 1e-12);
                assert_eq!(geometry.offset_vertices[t], facet.vertices);
            }
            Err(e) => assert_eq!(geometry.errors[t], Some(e)),
        }
    }
}

#[test]
fn reference_axis_does_not_change_areas() {
    init_tracing();
    let network = grid_network();
    let areas: Vec<Vec<f64>> = [ReferenceAxis::X, ReferenceAxis::Y, ReferenceAxis::Z]
        .into_iter()
        .map(|axis| {
            let params = ErosionParams::new(1.0).with_reference_axis(axis);
            ThroatErosion::new(params).erode(&network).unwrap().area
        })
        .collect();
    for t in 0..network.num_throats() {
        assert_relative_eq!(areas[0][t], areas[2][t], epsilon = 1e-9);
        assert_relative_eq!(areas[1][t], areas[2][t], epsilon = 1e-9);
    }
}

#[test]
fn large_radius_occludes_everything() {
    init_tracing();
    let mut network = grid_network();
    let report = ThroatErosion::new(ErosionParams::new(6.0))
        .with_pruning(OcclusionPruning::new(0.5))
        .execute(&mut network)
        .unwrap();
    assert_eq!(report.eroded, 0);
    assert_eq!(report.failure_count(ErosionError::FacetTooSmall), 4);
    assert_eq!(network.num_throats(), 0);
}
