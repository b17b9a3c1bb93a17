use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use iris_trainer_cli::train::input::TrainRequest;
use iris_trainer_cli::train::runner::run_training;
use iris_trainer_cli::util::default_config_json;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("IRIS_TRAINER_LOG", "error,iris_trainer=info"))
        .init();

    let matches = Command::new("iris-trainer")
        .version(clap::crate_version!())
        .about("Train a tracked random-forest classifier on a tabular dataset")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("train")
                .about("Split the dataset, fit the classifier and record the run")
                .arg(
                    Arg::new("data")
                        .help("Path to the training data (*.csv or *.tsv)")
                        .required_unless_present("synthetic")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("label_column")
                        .short('l')
                        .long("label-column")
                        .help("Name of the column holding the class labels")
                        .default_value("species")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("Path to a JSON training configuration file")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("model_name")
                        .short('n')
                        .long("model-name")
                        .help("Name the model is registered under. Overrides the configuration file.")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(
                    Arg::new("model_type")
                        .short('m')
                        .long("model-type")
                        .help("Model to train. Overrides the configuration file.")
                        .value_parser(["random_forest", "decision_tree"]),
                )
                .arg(
                    Arg::new("tracking_dir")
                        .short('o')
                        .long("tracking-dir")
                        .help("Directory runs are written to. Overrides the configuration file.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("no_report")
                        .long("no-report")
                        .help("Disable HTML report generation.")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("synthetic")
                        .long("synthetic")
                        .help("Train on a generated 150-row iris-like dataset instead of a file.")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("dry_run")
                        .long("dry-run")
                        .help("Keep the run in memory; nothing is written to disk.")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("default-config")
                .about("Print the default training configuration as JSON"),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    match matches.subcommand() {
        Some(("train", sub_m)) => handle_train(sub_m),
        Some(("default-config", _)) => {
            println!("{}", default_config_json()?);
            Ok(())
        }
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_train(matches: &ArgMatches) -> Result<()> {
    let request = TrainRequest::from_arguments(matches)?;
    log::info!(
        "[iris-trainer] Training '{}' on {:?} (label column '{}')",
        request.config.model_name,
        request.data,
        request.label_column
    );

    match run_training(&request) {
        Ok(summary) => {
            eprintln!(
                "[iris-trainer] Trained '{}' on {} rows, evaluated on {} rows, classes: {}",
                summary.model_name,
                summary.n_train,
                summary.n_test,
                summary.classes.join(", ")
            );
            if let Some(dir) = summary.run_dir {
                eprintln!("[iris-trainer] Run directory: {}", dir.display());
            }
            Ok(())
        }
        Err(e) => {
            log::error!("Training failed: {:#}", e);
            std::process::exit(1)
        }
    }
}
