use fdtd_tfsf::{
    Simulation,
    SimulationConfig,
    fdtd::{
        FieldComponent,
        tfsf::Bound,
    },
    output::{
        MemorySink,
        SampleSink,
        TextSink,
    },
};
use nalgebra::Point2;

fn max_abs<'a>(values: impl IntoIterator<Item = &'a f64>) -> f64 {
    values.into_iter().fold(0.0, |max, x| max.max(x.abs()))
}

#[test]
fn no_field_from_nothing() {
    let mut config = SimulationConfig {
        steps: 100,
        ..Default::default()
    };
    config.tfsf.enabled = false;
    config.abc.enabled = false;

    let mut simulation = Simulation::new(&config).unwrap();
    let mut sink = MemorySink::new(config.sample_stride);
    simulation.run(&mut sink).unwrap();

    assert_eq!(simulation.tick(), 100);
    assert_eq!(simulation.field().energy(), 0.0);
    assert_eq!(sink.blocks().len(), 20);
    for (_, samples) in sink.blocks() {
        assert!(samples.iter().all(|sample| {
            sample.ez == 0.0 && sample.hx == 0.0 && sample.hy == 0.0
        }));
    }
}

#[test]
fn default_run_stays_finite() {
    let config = SimulationConfig {
        steps: 300,
        ..Default::default()
    };

    let mut simulation = Simulation::new(&config).unwrap();
    let mut sink = MemorySink::new(config.sample_stride);
    simulation.run(&mut sink).unwrap();

    let field = simulation.field();
    assert!(field.ez().iter().all(|x| x.is_finite()));
    assert!(field.energy() > 0.0);
    assert_eq!(sink.blocks().len(), 60);
}

#[test]
fn scattered_field_region_stays_empty_before_scattering() {
    // with the source left of the box, the total field inside the box is an
    // exact copy of the incident line and nothing leaks out.
    let mut config = SimulationConfig::default();
    config.source.position = 2;

    let mut simulation = Simulation::new(&config).unwrap();
    for _ in 0..100 {
        simulation.step().unwrap();
    }

    let Bound { first, last } = config.tfsf.bound();
    let strider = *simulation.field().strider();
    let ez = simulation.field().ez();

    let (inside, outside): (Vec<_>, Vec<_>) = strider.iter(..).partition(|(_, point)| {
        (first.x..=last.x).contains(&point.x) && (first.y..=last.y).contains(&point.y)
    });

    let inside = max_abs(inside.iter().map(|(index, _)| &ez[*index]));
    let outside = max_abs(outside.iter().map(|(index, _)| &ez[*index]));
    assert!(inside > 0.5, "total field: {inside}");
    assert!(outside < 1e-9, "scattered field: {outside}");
}

#[test]
fn absorbing_boundary_removes_outgoing_waves() {
    let run = |abc: bool| {
        let mut config = SimulationConfig {
            size: 101,
            ..Default::default()
        };
        config.tfsf.enabled = false;
        config.abc.enabled = abc;
        config.scatterer.center = Point2::new(80, 20);
        config.scatterer.radius = 1.0;

        let mut simulation = Simulation::new(&config).unwrap();
        for y in 40..=60usize {
            for x in 40..=60usize {
                let r2 = (x.abs_diff(50).pow(2) + y.abs_diff(50).pow(2)) as f64;
                simulation.field_mut().set(
                    FieldComponent::Ez,
                    &Point2::new(x, y),
                    (-r2 / 9.0).exp(),
                );
            }
        }
        let initial = simulation.field().energy();

        for _ in 0..200 {
            simulation.step().unwrap();
        }
        (initial, simulation.field().energy())
    };

    let (initial, reflecting) = run(false);
    let (_, absorbing) = run(true);

    assert!(reflecting > 0.1 * initial, "{reflecting} vs {initial}");
    assert!(
        absorbing < 0.1 * reflecting,
        "absorbing {absorbing}, reflecting {reflecting}"
    );
}

#[test]
fn text_output_has_one_block_per_sample_tick() {
    let mut config = SimulationConfig {
        size: 40,
        steps: 12,
        ..Default::default()
    };
    config.scatterer.center = Point2::new(20, 20);
    config.scatterer.radius = 4.0;
    config.tfsf.first = Point2::new(5, 5);
    config.tfsf.last = Point2::new(34, 34);

    let mut simulation = Simulation::new(&config).unwrap();
    let mut sink = TextSink::new(vec![], config.sample_stride);
    simulation.run(&mut sink).unwrap();
    sink.finish().unwrap();
    let text = String::from_utf8(sink.into_inner()).unwrap();

    let blocks = text
        .split("\n\n\n")
        .filter(|block| !block.is_empty())
        .collect::<Vec<_>>();
    assert_eq!(blocks.len(), 3);

    for (block, tick) in blocks.iter().zip([0, 5, 10]) {
        let lines = block.lines().collect::<Vec<_>>();
        // 0, 5, .., 35 in both directions
        assert_eq!(lines.len(), 64);
        for line in lines {
            let fields = line.split('\t').collect::<Vec<_>>();
            assert_eq!(fields.len(), 7);
            assert_eq!(fields[0], tick.to_string());
            assert_eq!(fields[6], "");
        }
    }
}
