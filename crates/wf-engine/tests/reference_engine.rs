//! Integration tests for the Gaussian reference engine through the `WakeEngine` trait.

use wf_engine::{
    AxisSelection, EngineError, GaussianWakeEngine, Layout, RawPowerTensor, SimulationRequest,
    TabularTurbine, TurbulenceSpec, VaryingAxis, WakeEngine,
};
use wf_resource::{ResourceGridBuilder, WindResourceGrid, axis};

fn grid() -> WindResourceGrid {
    ResourceGridBuilder::default()
        .build(
            &axis(0.0, 360.0, 10.0).expect("direction axis"),
            &axis(3.0, 25.0, 1.0).expect("speed axis"),
        )
        .expect("default grid")
}

fn engine() -> GaussianWakeEngine<TabularTurbine> {
    GaussianWakeEngine::new(TabularTurbine::v80())
}

#[test]
fn output_rank_follows_request_selections() {
    let grid = grid();
    let layout = Layout::row(3, 400.0).unwrap();
    let engine = engine();

    let point = engine
        .simulate(&SimulationRequest::point(&grid, &layout, 12.0, 270.0, 0.08))
        .unwrap();
    assert_eq!(point.power.as_ref().map(RawPowerTensor::shape), Some(vec![3]));

    let by_speed = engine
        .simulate(&SimulationRequest::subset(
            &grid,
            &layout,
            270.0,
            vec![4.0, 8.0, 12.0],
            TurbulenceSpec::Scalar(0.08),
        ))
        .unwrap();
    match by_speed.power {
        Some(RawPowerTensor::TurbineBy { axis, values }) => {
            assert_eq!(axis, VaryingAxis::Speed);
            assert_eq!(values.shape(), &[3, 3]);
        }
        other => panic!("expected rank-2 tensor, got {other:?}"),
    }

    let subset = engine
        .simulate(&SimulationRequest::subset(
            &grid,
            &layout,
            vec![0.0, 90.0, 180.0, 270.0],
            vec![4.0, 8.0, 12.0, 16.0],
            TurbulenceSpec::Scalar(0.08),
        ))
        .unwrap();
    assert_eq!(subset.power.unwrap().shape(), vec![3, 4, 4]);
}

#[test]
fn full_grid_produces_positive_aggregate() {
    let grid = grid();
    let layout = Layout::row(3, 400.0).unwrap();
    let output = engine()
        .simulate(&SimulationRequest::full_grid(&grid, &layout))
        .unwrap();

    assert_eq!(output.power.unwrap().shape(), vec![3, 36, 22]);
    let aep = output.aep_gwh.expect("aggregate present");
    // Three 2 MW machines: well below 3 * 2 MW * 8760 h = 52.56 GWh
    assert!(aep > 5.0 && aep < 52.56, "aggregate {aep}");
}

#[test]
fn downstream_turbines_produce_less_in_westerly_wind() {
    let grid = grid();
    let layout = Layout::new(&[0.0, 400.0, 800.0], &[0.0; 3]).unwrap();
    let output = engine()
        .simulate(&SimulationRequest::point(&grid, &layout, 10.0, 270.0, 0.08))
        .unwrap();

    let Some(RawPowerTensor::Turbine(p)) = output.power else {
        panic!("expected rank-1 tensor");
    };
    assert!(p[1] < p[0]);
    assert!(p[2] < p[0]);
}

#[test]
fn negative_speed_is_rejected() {
    let grid = grid();
    let layout = Layout::row(2, 400.0).unwrap();
    let err = engine()
        .simulate(&SimulationRequest::point(&grid, &layout, -1.0, 270.0, 0.08))
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::NonPhysical {
            what: "wind speed",
            ..
        }
    ));
}

#[test]
fn empty_selection_is_rejected() {
    let grid = grid();
    let layout = Layout::row(2, 400.0).unwrap();
    let request = SimulationRequest::subset(
        &grid,
        &layout,
        AxisSelection::Values(vec![]),
        12.0,
        TurbulenceSpec::FromGrid,
    );
    assert!(matches!(
        engine().simulate(&request),
        Err(EngineError::InvalidRequest { .. })
    ));
}

#[test]
fn boxed_engine_behaves_like_concrete_engine() {
    let grid = grid();
    let layout = Layout::row(3, 400.0).unwrap();
    let request = SimulationRequest::point(&grid, &layout, 12.0, 270.0, 0.08);

    let boxed: Box<dyn WakeEngine> = Box::new(engine());
    assert_eq!(
        boxed.simulate(&request).unwrap(),
        engine().simulate(&request).unwrap()
    );
}
