//! End-to-end filter passes through the schedule.

use pelagos_core::{BufferList, BufferReader, ConstantBank, HostConstantBank, ParticleField};
use pelagos_filter::{FilterContext, FilterEngine, FilterSchedule, PassParams};
use pelagos_filters::{build_schedule, FilterType, MlsFilter};
use pelagos_model::{KernelType, ModelSetup};
use pelagos_test_utils::{
    brute_force_neighbors, lattice_block, positions_of, MockBufferReader, MockBufferWriter,
};

const SPACING: f32 = 0.1;
const H: f32 = 0.13;

fn radius() -> f32 {
    KernelType::Wendland.influence_radius(H)
}

fn with_neighbors(mut list: BufferList) -> BufferList {
    let neighbors = brute_force_neighbors(positions_of(&list), radius());
    list.set_neighbors(neighbors);
    list
}

#[test]
fn particles_past_range_end_are_bit_identical() {
    let src = with_neighbors(lattice_block(10, 1, 1, SPACING, 1000.0));
    let sentinel: Vec<f32> = (0..10)
        .map(|i| f32::from_bits(0x7fc0_0000 | i as u32))
        .collect();

    for ty in FilterType::ALL {
        let engine = ty.build(1, KernelType::Wendland);
        let mut writer = MockBufferWriter::new();
        writer.set_field(ParticleField::Density, sentinel.clone());
        let mut bank = HostConstantBank::new();
        engine.set_constants(&mut bank);

        let params = PassParams {
            num_particles: 10,
            particle_range_end: 6,
            slength: H,
            influence_radius: radius(),
        };
        let mut ctx = FilterContext::new(&src, &mut writer, &bank, params).unwrap();
        let report = engine.process(&mut ctx).unwrap();
        assert_eq!(report.visited(), 6, "{ty}");

        let out = writer.get_field(ParticleField::Density).unwrap();
        for i in 6..10 {
            assert_eq!(out[i].to_bits(), sentinel[i].to_bits(), "{ty} touched particle {i}");
        }
        for (i, rho) in out[..6].iter().enumerate() {
            assert!(!rho.is_nan(), "{ty} left particle {i} unwritten");
        }
    }
}

#[test]
fn shepard_preserves_uniform_density_through_schedule() {
    let _ = env_logger::builder().is_test(true).try_init();
    let model = ModelSetup {
        smoothing_length: H,
        ..ModelSetup::default()
    }
    .resolve()
    .unwrap();
    let mut schedule = build_schedule(&model, &[("Shepard", 5)]).unwrap();

    let src = with_neighbors(lattice_block(5, 5, 5, SPACING, 1000.0));
    let mut dst = lattice_block(5, 5, 5, SPACING, 0.0);
    dst.copy_from(&src);
    let mut bank = HostConstantBank::new();
    let params = PassParams::full(125, model.smoothing_length, model.influence_radius);

    for iteration in 0..6 {
        schedule
            .run_iteration(iteration, &src, &mut dst, &mut bank, params)
            .unwrap();
    }

    for &rho in dst.read(ParticleField::Density).unwrap() {
        assert!((rho - 1000.0).abs() < 1e-2, "density drifted to {rho}");
    }
    assert_eq!(
        dst.read(ParticleField::Mass),
        src.read(ParticleField::Mass),
        "filters must not write mass"
    );
    assert!(bank.download(pelagos_filters::shepard::SHEPARD_KERNEL_NORM).is_some());
}

#[test]
fn mls_reproduces_a_linear_density_field() {
    let list = lattice_block(5, 5, 5, SPACING, 1000.0);
    let positions = positions_of(&list).to_vec();
    let volume = SPACING * SPACING * SPACING;
    let density: Vec<f32> = positions
        .chunks_exact(3)
        .map(|p| 1000.0 + 50.0 * p[0] - 20.0 * p[2])
        .collect();
    let mass: Vec<f32> = density.iter().map(|rho| rho * volume).collect();

    let mut reader = MockBufferReader::new();
    reader.set_neighbors(brute_force_neighbors(&positions, radius()));
    reader.set_field(ParticleField::Position, positions);
    reader.set_field(ParticleField::Density, density.clone());
    reader.set_field(ParticleField::Mass, mass);

    let filter = MlsFilter::new(1, KernelType::Wendland);
    let mut writer = MockBufferWriter::new();
    writer.add_field(ParticleField::Density, 125);
    let mut bank = HostConstantBank::new();
    filter.set_constants(&mut bank);

    let mut ctx = FilterContext::new(
        &reader,
        &mut writer,
        &bank,
        PassParams::full(125, H, radius()),
    )
    .unwrap();
    let report = filter.process(&mut ctx).unwrap();
    assert_eq!(report.fallbacks, 0);

    let out = writer.get_field(ParticleField::Density).unwrap();
    for (i, (got, want)) in out.iter().zip(&density).enumerate() {
        assert!((got - want).abs() < 0.25, "particle {i}: {got} vs {want}");
    }
}

fn rippled_block() -> BufferList {
    let mut list = with_neighbors(lattice_block(5, 5, 5, SPACING, 1000.0));
    let density: Vec<f32> = (0..125)
        .map(|i| 1000.0 + 5.0 * ((i % 7) as f32 - 3.0))
        .collect();
    list.set(ParticleField::Density, density);
    list
}

fn single_pass(ty: FilterType, src: &BufferList) -> Vec<f32> {
    let mut schedule = FilterSchedule::new().with(ty.build(1, KernelType::Wendland));
    let mut dst = src.clone();
    let mut bank = HostConstantBank::new();
    schedule
        .run_iteration(0, src, &mut dst, &mut bank, PassParams::full(125, H, radius()))
        .unwrap();
    dst.read(ParticleField::Density).unwrap().to_vec()
}

#[test]
fn shepard_then_mls_chain_on_shared_iterations() {
    let model = ModelSetup {
        smoothing_length: H,
        ..ModelSetup::default()
    }
    .resolve()
    .unwrap();
    let mut schedule = build_schedule(&model, &[("shepard", 5), ("mls", 20)]).unwrap();
    let src = rippled_block();
    let params = PassParams::full(125, H, radius());

    let shepard = single_pass(FilterType::Shepard, &src);
    let mut smoothed = src.clone();
    smoothed.set(ParticleField::Density, shepard.clone());
    let shepard_then_mls = single_pass(FilterType::Mls, &smoothed);
    assert_ne!(shepard, src.read(ParticleField::Density).unwrap());

    let mut dst = src.clone();
    let mut bank = HostConstantBank::new();
    let records = schedule
        .run_iteration(5, &src, &mut dst, &mut bank, params)
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(dst.read(ParticleField::Density).unwrap(), shepard.as_slice());

    let mut dst = src.clone();
    let records = schedule
        .run_iteration(20, &src, &mut dst, &mut bank, params)
        .unwrap();
    let order: Vec<&str> = records.iter().map(|r| r.engine.as_str()).collect();
    assert_eq!(order, ["Shepard", "MLS"]);
    assert_eq!(
        dst.read(ParticleField::Density).unwrap(),
        shepard_then_mls.as_slice()
    );
}

#[test]
fn listing_a_filter_twice_is_rejected() {
    let model = ModelSetup::default().resolve().unwrap();
    match build_schedule(&model, &[("mls", 5), ("MLS", 20)]) {
        Err(pelagos_filter::ConfigError::DuplicateName { name }) => assert_eq!(name, "MLS"),
        Err(other) => panic!("expected DuplicateName, got {other:?}"),
        Ok(_) => panic!("expected DuplicateName, got a schedule"),
    }
}

#[test]
fn unknown_filter_name_is_a_model_error() {
    let model = ModelSetup::default().resolve().unwrap();
    match build_schedule(&model, &[("xsph", 5)]) {
        Err(pelagos_filter::ConfigError::Model(_)) => {}
        Err(other) => panic!("expected Model, got {other:?}"),
        Ok(_) => panic!("expected Model, got a schedule"),
    }
}

#[test]
fn pass_without_neighbors_fails() {
    let src = lattice_block(2, 2, 2, SPACING, 1000.0);
    let mut dst = lattice_block(2, 2, 2, SPACING, 1000.0);
    let mut bank = HostConstantBank::new();
    let mut schedule = FilterSchedule::new().with(FilterType::Mls.build(1, KernelType::Wendland));

    let err = schedule
        .run_iteration(0, &src, &mut dst, &mut bank, PassParams::full(8, H, radius()))
        .unwrap_err();
    assert_eq!(err.engine, "MLS");
    assert!(matches!(
        err.source,
        pelagos_core::FilterError::MissingNeighbors { .. }
    ));
}
