mod common;

use common::run;
use cosmoprop::{
    io::Verbosity,
    particle::Pid,
    propagation::{output::StepRecord, StepBranch},
    simulation::{InitialPopulation, PropagationSimulator},
};

const MAX_STEPS: &str = "--max-steps=300";

def_test!(
IN[]
OUT[records_1 = "records_1.dat", records_2 = "records_2.dat"]
fn propagation_with_same_seed_is_reproducible {
    for output_file in [records_1, records_2] {
        run([
            "propagate",
            output_file,
            "--seed=7",
            "--particles=2",
            "--redshift=1",
            "--lorentz-factor=1e12",
            MAX_STEPS,
        ]);
    }
    common::assert_files_identical(records_1, records_2);
});

def_test!(
IN[]
OUT[records_1 = "records_1.dat", records_2 = "records_2.dat"]
fn single_proton_run_to_completion_is_reproducible {
    for output_file in [records_1, records_2] {
        run([
            "propagate",
            output_file,
            "--seed=10",
            "--species=proton",
            "--redshift=1",
            "--lorentz-factor=1e12",
        ]);
    }
    common::assert_files_identical(records_1, records_2);

    let rows = common::read_table_rows(records_1);
    assert!(!rows.is_empty());
    assert_eq!(rows[0][1].parse::<f64>().unwrap(), 1.0);
    assert_eq!(rows[0][2].parse::<f64>().unwrap(), 1e12);
});

def_test!(
IN[]
OUT[records_1 = "records_1.dat", records_2 = "records_2.dat"]
fn propagation_with_different_seeds_diverges {
    for (output_file, seed) in [(records_1, "--seed=1"), (records_2, "--seed=2")] {
        run([
            "propagate",
            output_file,
            seed,
            "--redshift=1",
            "--lorentz-factor=1e12",
            MAX_STEPS,
        ]);
    }
    common::assert_files_differ(records_1, records_2);
});

def_test!(
IN[]
OUT[records = "records.dat", final_population = "final_population.dat"]
fn propagation_records_have_expected_format {
    let final_population_arg = format!("--final-population-file={}", final_population);
    run([
        "propagate",
        records,
        final_population_arg.as_str(),
        "--species=helium",
        "--redshift=0.5",
        "--lorentz-factor=5e10",
        MAX_STEPS,
    ]);
    common::assert_file_exists(final_population);

    let rows = common::read_table_rows(records);
    assert!(!rows.is_empty());
    assert_eq!(rows[0][0], "1000020040");
    for row in &rows {
        assert_eq!(row.len(), 4);
        let redshift: f64 = row[1].parse().unwrap();
        let lorentz_factor: f64 = row[2].parse().unwrap();
        assert!(redshift >= 0.0);
        assert!(lorentz_factor > 0.0);
        assert!(row[3] == "0" || row[3] == "1");
    }

    for row in common::read_table_rows(final_population) {
        assert_eq!(row.len(), 5);
    }
    assert!(!common::read_table_rows(final_population).is_empty());
});

def_test!(
IN[cross_section = "cross_section.dat", infrared_field = "infrared_field.dat"]
OUT[records = "records.dat"]
fn propagation_accepts_tabulated_inputs {
    let interaction_fields = format!("--interaction-fields=cmb,{}", infrared_field);
    let loss_fields = format!("--loss-fields=cmb,{}", infrared_field);
    let cross_section_arg = format!("--cross-section-file={}", cross_section);
    run([
        "propagate",
        records,
        cross_section_arg.as_str(),
        interaction_fields.as_str(),
        loss_fields.as_str(),
        "--redshift=0.2",
        "--lorentz-factor=1e12",
        "--max-steps=50",
    ]);
    assert!(!common::read_table_rows(records).is_empty());
});

def_test!(
IN[]
OUT[records = "records.dat"]
fn random_population_can_be_propagated {
    run([
        "propagate",
        records,
        "--random-population",
        "--particles=5",
        "--max-redshift=0.5",
        "--energy-range=10,100",
        "--max-steps=100",
    ]);
    let rows = common::read_table_rows(records);
    assert!(!rows.is_empty());
    assert!(rows.len() <= 100);
});

def_test!(
IN[infrared_field = "infrared_field.dat"]
OUT[table = "brightness.dat"]
fn photon_field_tables_are_written {
    let fields = format!("--fields=cmb,ebl,{}", infrared_field);
    run(["photon_fields", table, fields.as_str(), "--n-points=50"]);
    let rows = common::read_table_rows(table);
    assert_eq!(rows.len(), 3 * 50);
    for row in rows {
        assert_eq!(row.len(), 3);
        let brightness: f64 = row[2].parse().unwrap();
        assert!(brightness >= 0.0);
    }
});

def_test!(
IN[]
OUT[table = "rates.dat"]
fn rate_table_is_written {
    run([
        "rates",
        table,
        "--redshift=0.5",
        "--lorentz-factor-range=1e9,1e12",
        "--n-points=20",
    ]);
    let rows = common::read_table_rows(table);
    assert_eq!(rows.len(), 20);
    for row in &rows {
        assert_eq!(row.len(), 5);
    }
    let first_rate: f64 = rows[0][3].parse().unwrap();
    let last_rate: f64 = rows[19][3].parse().unwrap();
    assert_eq!(first_rate, 0.0);
    assert!(last_rate > 0.0);
});

fn run_simulator(simulator: &PropagationSimulator, max_steps: Option<usize>) -> Vec<StepRecord> {
    let mut records = Vec::new();
    simulator
        .run(&mut records, &Verbosity::Quiet, max_steps)
        .unwrap();
    records
}

#[test]
fn continuous_steps_decrease_redshift_and_lorentz_factor() {
    let mut simulator = PropagationSimulator::new(InitialPopulation::Single {
        pid: Pid::PROTON,
        redshift: 1.0,
        lorentz_factor: 1e10,
        n_particles: 1,
    });
    simulator.interaction_photon_fields.clear();

    let records = run_simulator(&simulator, Some(500));
    assert!(records.len() > 1);
    assert!(records
        .iter()
        .all(|record| record.branch == StepBranch::Continuous));
    for pair in records.windows(2) {
        assert!(pair[1].redshift < pair[0].redshift);
        assert!(pair[1].lorentz_factor <= pair[0].lorentz_factor);
    }
}

#[test]
fn particle_without_losses_or_interactions_jumps_to_present() {
    let mut simulator = PropagationSimulator::new(InitialPopulation::Single {
        pid: Pid::PROTON,
        redshift: 0.3,
        lorentz_factor: 1e10,
        n_particles: 1,
    });
    simulator.include_pair_production = false;
    simulator.include_adiabatic_losses = false;
    simulator.interaction_photon_fields.clear();

    let mut records = Vec::new();
    let (summary, stack) = simulator
        .run(&mut records, &Verbosity::Quiet, None)
        .unwrap();

    assert_eq!(summary.steps, 1);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].branch, StepBranch::Continuous);
    let particle = stack.get(0).unwrap();
    assert_eq!(particle.redshift(), 0.0);
    assert_eq!(particle.lorentz_factor(), 1e10);
}

#[test]
fn interactions_produce_secondaries() {
    let simulator = PropagationSimulator::new(InitialPopulation::Single {
        pid: Pid::PROTON,
        redshift: 0.5,
        lorentz_factor: 1e12,
        n_particles: 1,
    });
    let mut records = Vec::new();
    let (summary, stack) = simulator
        .run(&mut records, &Verbosity::Quiet, Some(300))
        .unwrap();

    assert_eq!(summary.steps, records.len());
    let stochastic_records = records
        .iter()
        .filter(|record| record.branch == StepBranch::Stochastic)
        .count();
    assert_eq!(summary.interactions, stochastic_records);
    assert!(summary.interactions > 0);
    // Each proton interaction replaces the proton by a nucleon and a pion
    assert_eq!(summary.created_particles, 2 * summary.interactions);
    assert_eq!(stack.len(), 1 + summary.interactions);
    assert_eq!(
        stack.count(|particle| !particle.is_nucleus()),
        summary.interactions
    );
}

#[test]
fn without_losses_particles_interact_or_jump_to_present() {
    let mut simulator = PropagationSimulator::new(InitialPopulation::Single {
        pid: Pid::PROTON,
        redshift: 0.3,
        lorentz_factor: 1e12,
        n_particles: 1,
    });
    simulator.include_pair_production = false;
    simulator.include_adiabatic_losses = false;

    let mut records = Vec::new();
    let (summary, stack) = simulator
        .run(&mut records, &Verbosity::Quiet, None)
        .unwrap();

    assert!(!summary.step_limit_reached);
    assert!(summary.interactions > 0);

    // A continuous step spans the whole remaining redshift without changing
    // the Lorentz factor, so every nucleus that took one ends at z = 0.
    let nuclei_at_present = stack
        .iter()
        .filter(|particle| particle.is_nucleus() && particle.redshift() == 0.0)
        .count();
    assert_eq!(summary.continuous_steps, nuclei_at_present);
    for particle in stack.iter().filter(|particle| particle.is_nucleus()) {
        if particle.redshift() == 0.0 {
            assert!(records.iter().any(|record| {
                record.branch == StepBranch::Continuous
                    && record.lorentz_factor == particle.lorentz_factor()
            }));
        } else {
            assert!(particle.lorentz_factor() <= simulator.propagation_config.min_lorentz_factor);
        }
    }
}
