use std::io::{self, BufRead, Write};

use crate::app::AppError;
use crate::config::Config;
use crate::gas::{self, report, CalculationInput};
use crate::i18n::{keys, Translator};
use crate::lp_test::{self, NetworkResults, NominalDiameter, Sdr, StoredResult, TestDurationInput};

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    PressureLoss,
    TestDuration,
    Network,
    Settings,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    let mut stdin = io::stdin().lock();
    println!("{}", tr.t(keys::MAIN_MENU_TITLE));
    println!("{}", tr.t(keys::MAIN_MENU_PRESSURE_LOSS));
    println!("{}", tr.t(keys::MAIN_MENU_TEST_DURATION));
    println!("{}", tr.t(keys::MAIN_MENU_NETWORK));
    println!("{}", tr.t(keys::MAIN_MENU_SETTINGS));
    println!("{}", tr.t(keys::MAIN_MENU_EXIT));
    loop {
        let sel = read_line(&mut stdin, &tr.t(keys::PROMPT_MENU_SELECT))?;
        if let Some(choice) = map_menu(sel.trim()) {
            return Ok(choice);
        }
        println!("{}", tr.t(keys::INVALID_SELECTION_RETRY));
    }
}

fn map_menu(sel: &str) -> Option<MenuChoice> {
    match sel {
        "1" => Some(MenuChoice::PressureLoss),
        "2" => Some(MenuChoice::TestDuration),
        "3" => Some(MenuChoice::Network),
        "4" => Some(MenuChoice::Settings),
        "0" => Some(MenuChoice::Exit),
        _ => None,
    }
}

/// 압력손실 메뉴를 처리한다. 입력 오류는 메시지만 출력하고 메뉴로 돌아간다.
pub fn handle_pressure_loss(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    let mut stdin = io::stdin().lock();
    println!("{}", tr.t(keys::PRESSURE_LOSS_HEADING));
    let upstream = read_f64(&mut stdin, tr, &tr.t(keys::PROMPT_UPSTREAM_PRESSURE))?;
    let flow = read_f64(&mut stdin, tr, &tr.t(keys::PROMPT_FLOW_RATE))?;
    let length = read_f64(&mut stdin, tr, &tr.t(keys::PROMPT_PIPE_LENGTH))?;
    let efficiency = read_f64_or(
        &mut stdin,
        tr,
        &tr.t(keys::PROMPT_EFFICIENCY),
        cfg.default_efficiency_factor,
    )?;
    println!("{}", tr.t(keys::PIPE_LIST_HEADING));
    for (index, spec) in gas::pipe_options() {
        println!("  {index:>2}) {spec}");
    }
    let pipe_index =
        read_usize_or(&mut stdin, tr, &tr.t(keys::PROMPT_PIPE), cfg.default_pipe_index)?;
    let altitude = read_f64(&mut stdin, tr, &tr.t(keys::PROMPT_ALTITUDE))?;

    let input = CalculationInput {
        upstream_pressure_mbar: upstream,
        base_gas_flow_rate_m3_per_h: flow,
        pipe_length_m: length,
        pipe_efficiency_factor: efficiency,
        pipe_index,
        change_in_altitude_m: altitude,
    };
    match gas::compute(&input) {
        Ok(res) => {
            for line in report::summary_lines(&res) {
                println!("{line}");
            }
            println!("{}", tr.t(keys::PRESSURE_LOSS_DETAILS));
            for line in report::detail_lines(&res) {
                println!("  {line}");
            }
        }
        Err(e) => print_error(tr, &e),
    }
    Ok(())
}

/// 기밀시험 시간 메뉴를 처리한다. 성공한 결과는 세션 누적 목록에 추가한다.
pub fn handle_test_duration(
    tr: &Translator,
    network: &mut NetworkResults,
) -> Result<(), AppError> {
    println!("{}", tr.t(keys::TEST_DURATION_HEADING));
    let mut stdin = io::stdin().lock();
    let diameter =
        read_parsed::<_, NominalDiameter>(&mut stdin, tr, &tr.t(keys::PROMPT_DIAMETER))?;
    let sdr = read_parsed::<_, Sdr>(&mut stdin, tr, &tr.t(keys::PROMPT_SDR))?;
    let length = read_f64(&mut stdin, tr, &tr.t(keys::PROMPT_PIPE_LENGTH))?;
    let input = TestDurationInput {
        diameter,
        sdr,
        pipe_length_m: length,
    };
    match lp_test::compute_test_duration(&input) {
        Ok(res) => {
            println!("{}", res.message());
            match network.add(StoredResult::from(&res)) {
                Ok(()) => println!("{}", tr.t(keys::TEST_DURATION_ADDED)),
                Err(e) => print_error(tr, &e),
            }
        }
        Err(e) => print_error(tr, &e),
    }
    Ok(())
}

/// 망 누적 결과 메뉴를 처리한다.
pub fn handle_network(tr: &Translator, network: &mut NetworkResults) -> Result<(), AppError> {
    let mut stdin = io::stdin().lock();
    println!("{}", tr.t(keys::NETWORK_HEADING));
    println!("{}", tr.t(keys::NETWORK_OPTIONS));
    let sel = read_line(&mut stdin, &tr.t(keys::PROMPT_SELECT))?;
    match sel.trim() {
        "1" => {
            if network.is_empty() {
                println!("{}", tr.t(keys::NETWORK_EMPTY));
            }
            for line in network.summary_lines() {
                println!("{line}");
            }
        }
        "2" => {
            network.clear();
            println!("{}", tr.t(keys::NETWORK_CLEARED));
        }
        _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
    }
    Ok(())
}

/// 설정 메뉴를 처리한다. 언어가 바뀌었으면 true.
pub fn handle_settings(tr: &Translator, cfg: &mut Config) -> Result<bool, AppError> {
    let mut stdin = io::stdin().lock();
    println!("{}", tr.t(keys::SETTINGS_HEADING));
    println!("{} {}", tr.t(keys::SETTINGS_CURRENT_LANGUAGE), cfg.language);
    let mut language_changed = false;
    let lang = read_line(&mut stdin, &tr.t(keys::SETTINGS_PROMPT_LANGUAGE))?;
    match lang.trim() {
        "" => {}
        code @ ("auto" | "en" | "ko") => {
            language_changed = code != cfg.language;
            cfg.language = code.to_string();
        }
        _ => println!("{}", tr.t(keys::SETTINGS_INVALID)),
    }

    println!(
        "{} {}",
        tr.t(keys::SETTINGS_CURRENT_EFFICIENCY),
        cfg.default_efficiency_factor
    );
    let eff = read_line(&mut stdin, &tr.t(keys::SETTINGS_PROMPT_EFFICIENCY))?;
    if !eff.trim().is_empty() {
        match parse_number(&eff) {
            Some(v) if v > 0.0 && v <= 1.0 => cfg.default_efficiency_factor = v,
            _ => println!("{}", tr.t(keys::SETTINGS_INVALID)),
        }
    }
    println!("{}", tr.t(keys::SETTINGS_SAVED));
    Ok(language_changed)
}

/// 입력 문자열을 유한한 실수로 해석한다.
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn print_error(tr: &Translator, err: &dyn std::error::Error) {
    println!("{}: {err}", tr.t(keys::ERROR_PREFIX));
}

/// 프롬프트를 출력하고 한 줄을 읽는다. 입력이 닫혔으면(EOF) `AppError::InputClosed`.
fn read_line<R: BufRead>(input: &mut R, prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Err(AppError::InputClosed);
    }
    Ok(buf)
}

fn read_f64<R: BufRead>(input: &mut R, tr: &Translator, prompt: &str) -> Result<f64, AppError> {
    loop {
        let s = read_line(input, prompt)?;
        match parse_number(&s) {
            Some(v) => return Ok(v),
            None => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

fn read_f64_or<R: BufRead>(
    input: &mut R,
    tr: &Translator,
    prompt: &str,
    default: f64,
) -> Result<f64, AppError> {
    loop {
        let s = read_line(input, prompt)?;
        if s.trim().is_empty() {
            return Ok(default);
        }
        match parse_number(&s) {
            Some(v) => return Ok(v),
            None => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

fn read_usize_or<R: BufRead>(
    input: &mut R,
    tr: &Translator,
    prompt: &str,
    default: usize,
) -> Result<usize, AppError> {
    loop {
        let s = read_line(input, prompt)?;
        if s.trim().is_empty() {
            return Ok(default);
        }
        match s.trim().parse::<usize>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

fn read_parsed<R, T>(input: &mut R, tr: &Translator, prompt: &str) -> Result<T, AppError>
where
    R: BufRead,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    loop {
        let s = read_line(input, prompt)?;
        match s.trim().parse::<T>() {
            Ok(v) => return Ok(v),
            Err(e) => println!("{}: {e}", tr.t(keys::ERROR_PREFIX)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parse_number_rejects_text_and_non_finite() {
        assert_eq!(parse_number(" 50 \n"), Some(50.0));
        assert_eq!(parse_number("-12.5"), Some(-12.5));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn menu_numbers_map_to_choices() {
        assert_eq!(map_menu("2"), Some(MenuChoice::TestDuration));
        assert_eq!(map_menu("9"), None);
    }

    #[test]
    fn end_of_input_stops_the_retry_loops() {
        let tr = Translator::new("en");
        let mut input = Cursor::new("abc\n");
        assert!(matches!(
            read_f64(&mut input, &tr, ""),
            Err(AppError::InputClosed)
        ));
        let mut empty = Cursor::new("");
        assert!(matches!(
            read_parsed::<_, Sdr>(&mut empty, &tr, ""),
            Err(AppError::InputClosed)
        ));
    }

    #[test]
    fn blank_line_takes_the_default() {
        let tr = Translator::new("en");
        let mut input = Cursor::new("\n0.9\n");
        assert_eq!(read_f64_or(&mut input, &tr, "", 0.97).unwrap(), 0.97);
        assert_eq!(read_f64_or(&mut input, &tr, "", 0.97).unwrap(), 0.9);
    }
}
