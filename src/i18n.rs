use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;
use tracing::debug;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_PRESSURE_LOSS: &str = "main_menu.pressure_loss";
    pub const MAIN_MENU_TEST_DURATION: &str = "main_menu.test_duration";
    pub const MAIN_MENU_NETWORK: &str = "main_menu.network";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const PROMPT_SELECT: &str = "prompt.select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";

    pub const PRESSURE_LOSS_HEADING: &str = "pressure_loss.heading";
    pub const PROMPT_UPSTREAM_PRESSURE: &str = "pressure_loss.prompt_upstream_pressure";
    pub const PROMPT_FLOW_RATE: &str = "pressure_loss.prompt_flow_rate";
    pub const PROMPT_PIPE_LENGTH: &str = "prompt.pipe_length";
    pub const PROMPT_EFFICIENCY: &str = "pressure_loss.prompt_efficiency";
    pub const PROMPT_PIPE: &str = "pressure_loss.prompt_pipe";
    pub const PROMPT_ALTITUDE: &str = "pressure_loss.prompt_altitude";
    pub const PIPE_LIST_HEADING: &str = "pressure_loss.pipe_list_heading";
    pub const PRESSURE_LOSS_DETAILS: &str = "pressure_loss.details";

    pub const TEST_DURATION_HEADING: &str = "test_duration.heading";
    pub const PROMPT_DIAMETER: &str = "test_duration.prompt_diameter";
    pub const PROMPT_SDR: &str = "test_duration.prompt_sdr";
    pub const TEST_DURATION_ADDED: &str = "test_duration.added";

    pub const NETWORK_HEADING: &str = "network.heading";
    pub const NETWORK_OPTIONS: &str = "network.options";
    pub const NETWORK_EMPTY: &str = "network.empty";
    pub const NETWORK_CLEARED: &str = "network.cleared";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_CURRENT_LANGUAGE: &str = "settings.current_language";
    pub const SETTINGS_PROMPT_LANGUAGE: &str = "settings.prompt_language";
    pub const SETTINGS_CURRENT_EFFICIENCY: &str = "settings.current_efficiency";
    pub const SETTINGS_PROMPT_EFFICIENCY: &str = "settings.prompt_efficiency";
    pub const SETTINGS_INVALID: &str = "settings.invalid";
    pub const SETTINGS_SAVED: &str = "settings.saved";

    pub const GUI_APP_TITLE: &str = "gui.app_title";
    pub const GUI_TAB_PRESSURE_LOSS: &str = "gui.tab.pressure_loss";
    pub const GUI_TAB_TEST_DURATION: &str = "gui.tab.test_duration";
    pub const GUI_TAB_NETWORK: &str = "gui.tab.network";
    pub const GUI_CALCULATE: &str = "gui.calculate";
    pub const GUI_CLEAR: &str = "gui.clear";
    pub const GUI_EXPORT: &str = "gui.export";
    pub const GUI_EXPORTED: &str = "gui.exported";
    pub const GUI_SETTINGS: &str = "gui.settings";
    pub const GUI_SETTINGS_SAVE: &str = "gui.settings.save";
    pub const GUI_SETTINGS_ALPHA: &str = "gui.settings.alpha";
    pub const GUI_UPSTREAM_PRESSURE: &str = "gui.upstream_pressure";
    pub const GUI_FLOW_RATE: &str = "gui.flow_rate";
    pub const GUI_PIPE_LENGTH: &str = "gui.pipe_length";
    pub const GUI_EFFICIENCY: &str = "gui.efficiency";
    pub const GUI_PIPE: &str = "gui.pipe";
    pub const GUI_ALTITUDE: &str = "gui.altitude";
    pub const GUI_DIAMETER: &str = "gui.diameter";
    pub const GUI_SDR: &str = "gui.sdr";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    En,
    Ko,
}

impl Language {
    fn from_code(code: &str) -> Self {
        if code.to_lowercase().starts_with("ko") {
            Language::Ko
        } else {
            Language::En
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ko => "ko",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(en/ko)에 따라 번역기를 생성한다. 알 수 없는 코드는 en으로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code));
        if overrides.is_some() {
            debug!(lang = lang_code, "language pack loaded");
        }
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// 번역을 가져온다. 언어팩 → 내장 문자열 → 영어 순으로 찾는다.
    pub fn t(&self, key: &str) -> String {
        if let Some(v) = self.overrides.as_ref().and_then(|m| m.get(key)) {
            return v.clone();
        }
        let built_in = match self.lang {
            Language::Ko => ko(key).unwrap_or_else(|| en(key)),
            Language::En => en(key),
        };
        built_in.to_string()
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other if other.starts_with("ko") => Some("ko".into()),
        other if other.starts_with("en") => Some("en".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" => Some("ko".into()),
        "en" => Some("en".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(lang) = get_locale().as_deref().and_then(normalize_locale_string) {
        return Some(lang);
    }
    ["LANG", "LC_ALL"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|v| normalize_locale_string(&v))
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 또는 중첩 테이블.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let path = Path::new(dir).join(format!("{lang}.toml"));
    let content = fs::read_to_string(path).ok()?;
    parse_toml_to_map(&content)
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn en(key: &str) -> &'static str {
    use keys::*;
    match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Exiting application.",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        MAIN_MENU_TITLE => "\n=== Gas Mains Toolbox ===",
        MAIN_MENU_PRESSURE_LOSS => "1) Natural gas pressure loss",
        MAIN_MENU_TEST_DURATION => "2) LP mains test duration",
        MAIN_MENU_NETWORK => "3) Network test results",
        MAIN_MENU_SETTINGS => "4) Settings",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        PROMPT_SELECT => "Select: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please try again.",
        PRESSURE_LOSS_HEADING => "\n-- Natural Gas Pressure Loss --",
        PROMPT_UPSTREAM_PRESSURE => "Upstream pressure [mbar]: ",
        PROMPT_FLOW_RATE => "Base gas flow rate [m3/h]: ",
        PROMPT_PIPE_LENGTH => "Pipe length [m]: ",
        PROMPT_EFFICIENCY => "Pipe efficiency factor (enter for default): ",
        PROMPT_PIPE => "Nominal pipe diameter and SDR (number, enter for default): ",
        PROMPT_ALTITUDE => "Change in altitude [m] (can be zero or negative): ",
        PIPE_LIST_HEADING => "Pipe options:",
        PRESSURE_LOSS_DETAILS => "Details:",
        TEST_DURATION_HEADING => "\n-- LP Mains Test Duration (MOP <= 75 mbar) --",
        PROMPT_DIAMETER => "Nominal pipe diameter [mm] (63/90/125/180/250/315/355): ",
        PROMPT_SDR => "SDR (11/13.6/17.6/21/26): ",
        TEST_DURATION_ADDED => "These figures have been added to the network results.",
        NETWORK_HEADING => "\n-- Network Test Results --",
        NETWORK_OPTIONS => "1) Show  2) Clear",
        NETWORK_EMPTY => "No network results are stored.",
        NETWORK_CLEARED => "Network results cleared.",
        SETTINGS_HEADING => "\n-- Settings --",
        SETTINGS_CURRENT_LANGUAGE => "Current language:",
        SETTINGS_PROMPT_LANGUAGE => "Language (auto/en/ko, enter to keep): ",
        SETTINGS_CURRENT_EFFICIENCY => "Default pipe efficiency factor:",
        SETTINGS_PROMPT_EFFICIENCY => "New default efficiency factor (enter to keep): ",
        SETTINGS_INVALID => "Invalid input; setting unchanged.",
        SETTINGS_SAVED => "Settings saved.",
        GUI_APP_TITLE => "Gas Mains Toolbox",
        GUI_TAB_PRESSURE_LOSS => "Pressure Loss",
        GUI_TAB_TEST_DURATION => "LP Test Duration",
        GUI_TAB_NETWORK => "Network Results",
        GUI_CALCULATE => "Calculate",
        GUI_CLEAR => "Clear stored results",
        GUI_EXPORT => "Export report",
        GUI_EXPORTED => "Report saved:",
        GUI_SETTINGS => "Settings",
        GUI_SETTINGS_SAVE => "Save settings",
        GUI_SETTINGS_ALPHA => "Window transparency",
        GUI_UPSTREAM_PRESSURE => "Upstream pressure [mbar]",
        GUI_FLOW_RATE => "Base gas flow rate [m3/h]",
        GUI_PIPE_LENGTH => "Pipe length [m]",
        GUI_EFFICIENCY => "Pipe efficiency factor",
        GUI_PIPE => "Nominal pipe diameter and SDR",
        GUI_ALTITUDE => "Change in altitude [m]",
        GUI_DIAMETER => "Nominal pipe diameter [mm]",
        GUI_SDR => "Standard dimension ratio",
        _ => "[missing translation]",
    }
}

fn ko(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "오류",
        APP_EXIT => "프로그램을 종료합니다.",
        ERROR_INVALID_NUMBER => "숫자를 입력하세요.",
        MAIN_MENU_PRESSURE_LOSS => "1) 천연가스 압력손실",
        MAIN_MENU_TEST_DURATION => "2) 저압 본관 기밀시험 시간",
        MAIN_MENU_NETWORK => "3) 망 시험 결과 누적",
        MAIN_MENU_SETTINGS => "4) 설정",
        MAIN_MENU_EXIT => "0) 종료",
        PROMPT_MENU_SELECT => "메뉴 선택: ",
        PROMPT_SELECT => "선택: ",
        INVALID_SELECTION_RETRY => "잘못된 입력입니다. 다시 선택하세요.",
        PRESSURE_LOSS_HEADING => "\n-- 천연가스 압력손실 --",
        PROMPT_UPSTREAM_PRESSURE => "상류 압력 [mbar]: ",
        PROMPT_FLOW_RATE => "기준 가스 유량 [m3/h]: ",
        PROMPT_PIPE_LENGTH => "배관 길이 [m]: ",
        PROMPT_EFFICIENCY => "배관 효율계수 (엔터 시 기본값): ",
        PROMPT_PIPE => "호칭경/SDR 번호 (엔터 시 기본값): ",
        PROMPT_ALTITUDE => "고도 변화 [m] (0 또는 음수 가능): ",
        PIPE_LIST_HEADING => "배관 목록:",
        PRESSURE_LOSS_DETAILS => "상세:",
        TEST_DURATION_HEADING => "\n-- 저압 본관 기밀시험 시간 (MOP <= 75 mbar) --",
        PROMPT_DIAMETER => "호칭경 [mm] (63/90/125/180/250/315/355): ",
        PROMPT_SDR => "SDR (11/13.6/17.6/21/26): ",
        TEST_DURATION_ADDED => "결과가 망 누적 목록에 추가되었습니다.",
        NETWORK_HEADING => "\n-- 망 시험 결과 --",
        NETWORK_OPTIONS => "1) 보기  2) 비우기",
        NETWORK_EMPTY => "저장된 결과가 없습니다.",
        NETWORK_CLEARED => "누적 결과를 비웠습니다.",
        SETTINGS_HEADING => "\n-- 설정 --",
        SETTINGS_CURRENT_LANGUAGE => "현재 언어:",
        SETTINGS_PROMPT_LANGUAGE => "언어 (auto/en/ko, 엔터 시 유지): ",
        SETTINGS_CURRENT_EFFICIENCY => "기본 배관 효율계수:",
        SETTINGS_PROMPT_EFFICIENCY => "새 기본 효율계수 (엔터 시 유지): ",
        SETTINGS_INVALID => "잘못된 입력이므로 변경하지 않습니다.",
        SETTINGS_SAVED => "설정을 저장했습니다.",
        GUI_TAB_PRESSURE_LOSS => "압력손실",
        GUI_TAB_TEST_DURATION => "기밀시험 시간",
        GUI_TAB_NETWORK => "망 누적 결과",
        GUI_CALCULATE => "계산",
        GUI_CLEAR => "누적 결과 비우기",
        GUI_EXPORT => "보고서 저장",
        GUI_EXPORTED => "보고서 저장됨:",
        GUI_SETTINGS => "설정",
        GUI_SETTINGS_SAVE => "설정 저장",
        GUI_SETTINGS_ALPHA => "창 투명도",
        GUI_UPSTREAM_PRESSURE => "상류 압력 [mbar]",
        GUI_FLOW_RATE => "기준 가스 유량 [m3/h]",
        GUI_PIPE_LENGTH => "배관 길이 [m]",
        GUI_EFFICIENCY => "배관 효율계수",
        GUI_PIPE => "호칭경 / SDR",
        GUI_ALTITUDE => "고도 변화 [m]",
        GUI_DIAMETER => "호칭경 [mm]",
        GUI_SDR => "SDR",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn korean_falls_back_to_english_for_untranslated_keys() {
        let tr = Translator::new("ko-kr");
        assert_eq!(tr.t(keys::MAIN_MENU_EXIT), "0) 종료");
        assert_eq!(tr.t(keys::MAIN_MENU_TITLE), "\n=== Gas Mains Toolbox ===");
    }

    #[test]
    fn cli_flag_wins_over_config() {
        assert_eq!(resolve_language("ko", Some("en")), "ko");
        assert_eq!(resolve_language("auto", Some("en-GB")), "en");
    }

    #[test]
    fn nested_pack_tables_flatten_to_dotted_keys() {
        let map = parse_toml_to_map("[gui.tab]\nnetwork = \"Netz\"\n").unwrap();
        assert_eq!(map.get("gui.tab.network").map(String::as_str), Some("Netz"));
    }
}
