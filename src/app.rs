use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::config::{Config, ConfigError};
use crate::gas::{self, report, CalculationInput, InputError};
use crate::i18n::{self, Translator};
use crate::lp_test::{
    self, NetworkError, NetworkResults, NetworkStore, ParseSelectionError, StoredResult,
    TestDurationError, TestDurationInput,
};
use crate::ui_cli::{self, MenuChoice};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 파일 입출력 오류
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// 압력손실 입력 오류
    #[error(transparent)]
    GasInput(#[from] InputError),
    /// 시험 시간 계산 오류
    #[error(transparent)]
    TestDuration(#[from] TestDurationError),
    /// 누적 결과 저장 오류
    #[error(transparent)]
    Network(#[from] NetworkError),
    /// 호칭경/SDR 선택 오류
    #[error(transparent)]
    Selection(#[from] ParseSelectionError),
    /// 대화형 입력이 닫힘(EOF)
    #[error("input closed")]
    InputClosed,
}

/// 대화형 CLI의 메인 루프를 실행한다.
///
/// 망 누적 결과는 세션 메모리에만 두며, 시작할 때마다 비어 있다.
pub fn run(config: &mut Config, config_path: &Path, tr: &mut Translator) -> Result<(), AppError> {
    let mut network = NetworkResults::new();
    loop {
        match run_menu_once(config, config_path, tr, &mut network) {
            Ok(true) => {}
            Ok(false) => break,
            Err(AppError::InputClosed) => {
                // Ctrl-D 또는 파이프 입력 끝: 종료와 같게 처리
                println!();
                config.save_to(config_path)?;
                break;
            }
            Err(e) => return Err(e),
        }
    }
    println!("{}", tr.t(i18n::keys::APP_EXIT));
    Ok(())
}

/// 메뉴 한 번을 처리한다. 종료를 고르면 false.
fn run_menu_once(
    config: &mut Config,
    config_path: &Path,
    tr: &mut Translator,
    network: &mut NetworkResults,
) -> Result<bool, AppError> {
    match ui_cli::main_menu(tr)? {
        MenuChoice::PressureLoss => ui_cli::handle_pressure_loss(tr, config)?,
        MenuChoice::TestDuration => ui_cli::handle_test_duration(tr, network)?,
        MenuChoice::Network => ui_cli::handle_network(tr, network)?,
        MenuChoice::Settings => {
            if ui_cli::handle_settings(tr, config)? {
                let resolved = i18n::resolve_language(&config.language, None);
                *tr = Translator::new_with_pack(&resolved, config.language_pack_dir.as_deref());
            }
            config.save_to(config_path)?;
        }
        MenuChoice::Exit => {
            config.save_to(config_path)?;
            return Ok(false);
        }
    }
    Ok(true)
}

/// 인자 모드 압력손실 계산. 결과 문구를 출력한다.
pub fn print_pressure_loss(input: &CalculationInput, details: bool) -> Result<(), AppError> {
    let res = gas::compute(input)?;
    for line in report::summary_lines(&res) {
        println!("{line}");
    }
    if details {
        for line in report::detail_lines(&res) {
            println!("  {line}");
        }
    }
    Ok(())
}

/// 배관 표를 출력한다.
pub fn print_pipe_table() {
    for (index, spec) in gas::pipe_options() {
        println!(
            "{index:>2}) {:<22} ID {:>6.2} mm",
            spec.to_string(),
            spec.internal_diameter_mm
        );
    }
}

/// 인자 모드 시험 시간 계산. `store`가 있으면 결과를 파일에 누적한다.
pub fn print_test_duration(
    tr: &Translator,
    input: &TestDurationInput,
    store: Option<&NetworkStore>,
) -> Result<(), AppError> {
    let res = lp_test::compute_test_duration(input)?;
    println!("{}", res.message());
    if let Some(store) = store {
        let results = store.append(StoredResult::from(&res))?;
        info!(sections = results.len(), "test duration stored");
        println!("{}", tr.t(i18n::keys::TEST_DURATION_ADDED));
    }
    Ok(())
}

/// 저장 파일의 망 누적 결과를 출력한다.
pub fn print_network(tr: &Translator, store: &NetworkStore) -> Result<(), AppError> {
    let results = store.load()?;
    if results.is_empty() {
        println!("{}", tr.t(i18n::keys::NETWORK_EMPTY));
        return Ok(());
    }
    for line in results.summary_lines() {
        println!("{line}");
    }
    Ok(())
}
