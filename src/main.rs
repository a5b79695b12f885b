use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use gas_mains_toolbox::{
    app::{self, AppError},
    config,
    gas::CalculationInput,
    i18n::{self, Translator},
    lp_test::{NetworkStore, NominalDiameter, Sdr, TestDurationInput},
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(author, version, about = "Natural gas mains design calculators")]
struct Cli {
    /// Interface language (auto/en/ko).
    #[arg(long, short = 'L', default_value = "auto")]
    lang: String,

    /// Config file path.
    #[arg(long, default_value = config::CONFIG_FILE)]
    config: PathBuf,

    /// Runs the interactive menu when omitted.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Natural gas pressure loss and velocity for a PE main.
    PressureLoss {
        /// Upstream pressure [mbar gauge].
        #[arg(long)]
        upstream_pressure: f64,
        /// Base gas flow rate [m3/h].
        #[arg(long)]
        flow_rate: f64,
        /// Pipe length [m].
        #[arg(long)]
        length: f64,
        /// Pipe efficiency factor (0 < f <= 1). Defaults to the configured value.
        #[arg(long)]
        efficiency: Option<f64>,
        /// Pipe table index (see `pipes`). Defaults to the configured value.
        #[arg(long)]
        pipe: Option<usize>,
        /// Change in altitude [m]; may be zero or negative.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        altitude: f64,
        /// Also print intermediate values.
        #[arg(long)]
        details: bool,
    },
    /// List the nominal pipe diameter / SDR table.
    Pipes,
    /// Minimum test duration for an LP main (MOP <= 75 mbar).
    TestDuration {
        /// Nominal pipe diameter [mm].
        #[arg(long)]
        diameter: NominalDiameter,
        /// Standard dimension ratio, e.g. SDR11 or 17.6.
        #[arg(long)]
        sdr: Sdr,
        /// Pipe length [m].
        #[arg(long)]
        length: f64,
        /// Add the result to the stored network results.
        #[arg(long)]
        store: bool,
    },
    /// Stored network test results.
    Network {
        #[command(subcommand)]
        action: NetworkAction,
    },
}

#[derive(Subcommand, Debug)]
enum NetworkAction {
    /// Show the stored sections and the total test duration.
    Show,
    /// Remove all stored sections.
    Clear,
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 CLI 애플리케이션을 실행한다.
fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match try_run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn try_run(cli: Cli) -> Result<(), AppError> {
    let mut cfg = config::load_or_create(&cli.config)?;
    let lang = i18n::resolve_language(&cli.lang, Some(cfg.language.as_str()));
    let mut tr = Translator::new_with_pack(&lang, cfg.language_pack_dir.as_deref());
    let store = NetworkStore::new(cfg.network_results_path());

    match cli.command {
        None => app::run(&mut cfg, &cli.config, &mut tr),
        Some(Command::PressureLoss {
            upstream_pressure,
            flow_rate,
            length,
            efficiency,
            pipe,
            altitude,
            details,
        }) => {
            let input = CalculationInput {
                upstream_pressure_mbar: upstream_pressure,
                base_gas_flow_rate_m3_per_h: flow_rate,
                pipe_length_m: length,
                pipe_efficiency_factor: efficiency.unwrap_or(cfg.default_efficiency_factor),
                pipe_index: pipe.unwrap_or(cfg.default_pipe_index),
                change_in_altitude_m: altitude,
            };
            app::print_pressure_loss(&input, details)
        }
        Some(Command::Pipes) => {
            app::print_pipe_table();
            Ok(())
        }
        Some(Command::TestDuration {
            diameter,
            sdr,
            length,
            store: keep,
        }) => {
            let input = TestDurationInput {
                diameter,
                sdr,
                pipe_length_m: length,
            };
            app::print_test_duration(&tr, &input, keep.then_some(&store))
        }
        Some(Command::Network { action }) => match action {
            NetworkAction::Show => app::print_network(&tr, &store),
            NetworkAction::Clear => {
                store.clear()?;
                println!("{}", tr.t(i18n::keys::NETWORK_CLEARED));
                Ok(())
            }
        },
    }
}

fn init_tracing() {
    // 대화형 프롬프트를 가리지 않도록 기본은 warn
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
