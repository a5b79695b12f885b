#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점.

use eframe::{egui, App, Frame};
use gas_mains_toolbox::{
    config,
    gas::{self, report, CalculationInput},
    i18n::{self, keys},
    lp_test::{self, NetworkResults, NominalDiameter, Sdr, StoredResult, TestDurationInput},
    ui_cli::parse_number,
};
use image::GenericImageView;
use rfd::FileDialog;
use std::{env, fs, path::Path};
use tracing::{info, warn};

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // CLI 언어 옵션 처리: --lang xx 또는 --lang=xx (xx: auto/en/ko)
    let mut cli_lang: Option<String> = None;
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let a = &args[i];
        if let Some(val) = a.strip_prefix("--lang=") {
            cli_lang = Some(val.to_string());
        } else if (a == "--lang" || a == "-L") && i + 1 < args.len() {
            cli_lang = Some(args[i + 1].clone());
            i += 1;
        }
        i += 1;
    }

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(egui::vec2(760.0, 620.0))
        .with_transparent(true);
    if let Some(icon) = load_app_icon() {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let mut app_cfg = config::load_or_default().unwrap_or_else(|e| {
        warn!(error = %e, "config load failed, using defaults");
        config::Config::default()
    });
    if let Some(lang_cli) = cli_lang {
        app_cfg.language = i18n::resolve_language(&lang_cli, Some(app_cfg.language.as_str()));
    }
    eframe::run_native(
        "Gas Mains Toolbox",
        options,
        Box::new(move |cc| {
            if let Err(e) = setup_fonts(&cc.egui_ctx) {
                warn!("{e}");
            }
            Box::new(GuiApp::new(app_cfg))
        }),
    )
}

fn load_app_icon() -> Option<egui::IconData> {
    let search = ["icon.png", "assets/icon.png", "../icon.png"];
    let path = search.iter().find(|p| Path::new(*p).exists())?;
    let bytes = fs::read(path).ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let rgba = img.to_rgba8();
    let (w, h) = img.dimensions();
    Some(egui::IconData {
        rgba: rgba.into_raw(),
        width: w,
        height: h,
    })
}

fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    let font_name = name.to_string();
    fonts
        .font_data
        .insert(font_name.clone(), egui::FontData::from_owned(bytes));
    fonts
        .families
        .entry(egui::FontFamily::Proportional)
        .or_default()
        .insert(0, font_name.clone());
    fonts
        .families
        .entry(egui::FontFamily::Monospace)
        .or_default()
        .insert(0, font_name);
    ctx.set_fonts(fonts);
}

/// 한글 표시용 폰트를 찾아 적용한다.
/// 1) assets/fonts/malgun.ttf
/// 2) Windows 시스템 폰트(맑은 고딕/굴림)
/// 모두 없으면 기본 폰트를 유지하고 Err를 돌려준다.
fn setup_fonts(ctx: &egui::Context) -> Result<(), String> {
    let asset_path = Path::new("assets/fonts/malgun.ttf");
    if asset_path.exists() {
        let bytes = fs::read(asset_path).map_err(|e| format!("Failed to read font file: {e}"))?;
        apply_font_bytes(ctx, bytes, "korean_font");
        return Ok(());
    }

    if let Some(windir) = env::var_os("WINDIR") {
        let fonts = Path::new(&windir).join("Fonts");
        for cand in ["malgun.ttf", "gulim.ttc"] {
            let p = fonts.join(cand);
            if p.exists() {
                let bytes = fs::read(&p)
                    .map_err(|e| format!("Failed to read system font ({}): {e}", p.display()))?;
                apply_font_bytes(ctx, bytes, "korean_font");
                return Ok(());
            }
        }
    }

    Err("Korean font not found; using the default font.".into())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    PressureLoss,
    TestDuration,
    Network,
}

struct GuiApp {
    config: config::Config,
    tr: i18n::Translator,
    tab: Tab,
    window_alpha: f32,
    show_settings_modal: bool,
    lang_input: String,
    settings_status: Option<String>,
    // 압력손실
    pl_upstream: String,
    pl_flow: String,
    pl_length: String,
    pl_efficiency: String,
    pl_pipe: usize,
    pl_altitude: String,
    pl_lines: Vec<String>,
    // 기밀시험 시간
    td_diameter: NominalDiameter,
    td_sdr: Sdr,
    td_length: String,
    td_lines: Vec<String>,
    // 망 누적 결과 (세션 한정)
    network: NetworkResults,
    network_status: Option<String>,
}

impl GuiApp {
    fn new(config: config::Config) -> Self {
        let lang_code = i18n::resolve_language("auto", Some(config.language.as_str()));
        let tr = i18n::Translator::new_with_pack(&lang_code, config.language_pack_dir.as_deref());
        info!(lang = %lang_code, "GUI language resolved");
        Self {
            tr,
            tab: Tab::PressureLoss,
            window_alpha: config.window_alpha.clamp(0.3, 1.0),
            show_settings_modal: false,
            lang_input: config.language.clone(),
            settings_status: None,
            pl_upstream: String::new(),
            pl_flow: String::new(),
            pl_length: String::new(),
            pl_efficiency: config.default_efficiency_factor.to_string(),
            pl_pipe: config.default_pipe_index,
            pl_altitude: "0".into(),
            pl_lines: Vec::new(),
            td_diameter: NominalDiameter::default(),
            td_sdr: Sdr::Sdr11,
            td_length: String::new(),
            td_lines: Vec::new(),
            network: NetworkResults::new(),
            network_status: None,
            config,
        }
    }

    fn txt(&self, key: &str) -> String {
        self.tr.t(key)
    }

    fn pressure_loss_input(&self) -> CalculationInput {
        // 숫자가 아니면 NaN으로 넘겨 입력 검증 메시지를 그대로 쓴다
        let num = |s: &str| parse_number(s).unwrap_or(f64::NAN);
        CalculationInput {
            upstream_pressure_mbar: num(&self.pl_upstream),
            base_gas_flow_rate_m3_per_h: num(&self.pl_flow),
            pipe_length_m: num(&self.pl_length),
            pipe_efficiency_factor: num(&self.pl_efficiency),
            pipe_index: self.pl_pipe,
            change_in_altitude_m: num(&self.pl_altitude),
        }
    }

    fn calculate_pressure_loss(&mut self) {
        self.pl_lines = match gas::compute(&self.pressure_loss_input()) {
            Ok(res) => {
                let mut lines = report::summary_lines(&res);
                lines.push(String::new());
                lines.extend(report::detail_lines(&res));
                lines
            }
            Err(e) => vec![e.to_string()],
        };
    }

    fn calculate_test_duration(&mut self) {
        let input = TestDurationInput {
            diameter: self.td_diameter,
            sdr: self.td_sdr,
            pipe_length_m: parse_number(&self.td_length).unwrap_or(f64::NAN),
        };
        self.td_lines = match lp_test::compute_test_duration(&input) {
            Ok(res) => {
                let mut lines = vec![res.message()];
                match self.network.add(StoredResult::from(&res)) {
                    Ok(()) => lines.push(self.txt(keys::TEST_DURATION_ADDED)),
                    Err(e) => lines.push(e.to_string()),
                }
                lines
            }
            Err(e) => vec![e.to_string()],
        };
    }

    fn export_network(&mut self) {
        let Some(path) = FileDialog::new()
            .set_file_name("network_results.txt")
            .add_filter("Text", &["txt"])
            .save_file()
        else {
            return;
        };
        let body = self.network.summary_lines().join("\n");
        self.network_status = Some(match fs::write(&path, body) {
            Ok(()) => {
                info!(path = %path.display(), "network report exported");
                format!("{} {}", self.txt(keys::GUI_EXPORTED), path.display())
            }
            Err(e) => format!("{}: {e}", self.txt(keys::ERROR_PREFIX)),
        });
    }

    fn ui_nav(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for (tab, key) in [
                (Tab::PressureLoss, keys::GUI_TAB_PRESSURE_LOSS),
                (Tab::TestDuration, keys::GUI_TAB_TEST_DURATION),
                (Tab::Network, keys::GUI_TAB_NETWORK),
            ] {
                ui.selectable_value(&mut self.tab, tab, self.tr.t(key));
            }
        });
    }

    fn ui_pressure_loss(&mut self, ui: &mut egui::Ui) {
        ui.heading(self.txt(keys::GUI_TAB_PRESSURE_LOSS));
        ui.add_space(8.0);
        egui::Frame::group(ui.style()).show(ui, |ui| {
            egui::Grid::new("pressure_loss_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    for (key, value) in [
                        (keys::GUI_UPSTREAM_PRESSURE, &mut self.pl_upstream),
                        (keys::GUI_FLOW_RATE, &mut self.pl_flow),
                        (keys::GUI_PIPE_LENGTH, &mut self.pl_length),
                        (keys::GUI_EFFICIENCY, &mut self.pl_efficiency),
                    ] {
                        ui.label(self.tr.t(key));
                        ui.text_edit_singleline(value);
                        ui.end_row();
                    }
                    ui.label(self.tr.t(keys::GUI_PIPE));
                    let selected = gas::pipe_spec(self.pl_pipe)
                        .map(|spec| spec.to_string())
                        .unwrap_or_default();
                    egui::ComboBox::from_id_source("pl_pipe")
                        .selected_text(selected)
                        .show_ui(ui, |ui| {
                            for (index, spec) in gas::pipe_options() {
                                ui.selectable_value(&mut self.pl_pipe, index, spec.to_string());
                            }
                        });
                    ui.end_row();
                    ui.label(self.tr.t(keys::GUI_ALTITUDE));
                    ui.text_edit_singleline(&mut self.pl_altitude);
                    ui.end_row();
                });
            ui.add_space(8.0);
            if ui.button(self.tr.t(keys::GUI_CALCULATE)).clicked() {
                self.calculate_pressure_loss();
            }
        });
        ui.add_space(8.0);
        for line in &self.pl_lines {
            ui.label(line);
        }
    }

    fn ui_test_duration(&mut self, ui: &mut egui::Ui) {
        ui.heading(self.txt(keys::GUI_TAB_TEST_DURATION));
        ui.add_space(8.0);
        egui::Frame::group(ui.style()).show(ui, |ui| {
            egui::Grid::new("test_duration_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(self.tr.t(keys::GUI_DIAMETER));
                    egui::ComboBox::from_id_source("td_diameter")
                        .selected_text(self.td_diameter.to_string())
                        .show_ui(ui, |ui| {
                            for d in NominalDiameter::all() {
                                ui.selectable_value(&mut self.td_diameter, d, d.to_string());
                            }
                        });
                    ui.end_row();
                    ui.label(self.tr.t(keys::GUI_SDR));
                    egui::ComboBox::from_id_source("td_sdr")
                        .selected_text(self.td_sdr.as_str())
                        .show_ui(ui, |ui| {
                            for sdr in Sdr::ALL {
                                ui.selectable_value(&mut self.td_sdr, sdr, sdr.as_str());
                            }
                        });
                    ui.end_row();
                    ui.label(self.tr.t(keys::GUI_PIPE_LENGTH));
                    ui.text_edit_singleline(&mut self.td_length);
                    ui.end_row();
                });
            ui.add_space(8.0);
            if ui.button(self.tr.t(keys::GUI_CALCULATE)).clicked() {
                self.calculate_test_duration();
            }
        });
        ui.add_space(8.0);
        for line in &self.td_lines {
            ui.label(line);
        }
    }

    fn ui_network(&mut self, ui: &mut egui::Ui) {
        ui.heading(self.txt(keys::GUI_TAB_NETWORK));
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button(self.tr.t(keys::GUI_CLEAR)).clicked() {
                self.network.clear();
                self.network_status = Some(self.tr.t(keys::NETWORK_CLEARED));
            }
            let export = ui.add_enabled(
                !self.network.is_empty(),
                egui::Button::new(self.tr.t(keys::GUI_EXPORT)),
            );
            if export.clicked() {
                self.export_network();
            }
        });
        if let Some(msg) = &self.network_status {
            ui.small(msg);
        }
        ui.separator();
        if self.network.is_empty() {
            ui.label(self.txt(keys::NETWORK_EMPTY));
            return;
        }
        for line in self.network.summary_lines() {
            ui.label(line);
        }
    }

    fn ui_settings(&mut self, ctx: &egui::Context) {
        let tr = self.tr.clone();
        let mut open = self.show_settings_modal;
        egui::Window::new(tr.t(keys::GUI_SETTINGS))
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(tr.t(keys::GUI_SETTINGS_ALPHA));
                ui.add(egui::Slider::new(&mut self.window_alpha, 0.3..=1.0).text("alpha"));
                ui.separator();
                ui.label(tr.t(keys::SETTINGS_CURRENT_LANGUAGE));
                egui::ComboBox::from_id_source("lang_choice")
                    .selected_text(&self.lang_input)
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut self.lang_input, "auto".into(), "System");
                        ui.selectable_value(&mut self.lang_input, "en".into(), "English");
                        ui.selectable_value(&mut self.lang_input, "ko".into(), "한국어");
                    });
                if ui.button(tr.t(keys::GUI_SETTINGS_SAVE)).clicked() {
                    self.config.language = self.lang_input.clone();
                    self.config.window_alpha = self.window_alpha;
                    let resolved = i18n::resolve_language(&self.config.language, None);
                    self.tr = i18n::Translator::new_with_pack(
                        &resolved,
                        self.config.language_pack_dir.as_deref(),
                    );
                    self.settings_status = Some(match self.config.save() {
                        Ok(()) => self.tr.t(keys::SETTINGS_SAVED),
                        Err(e) => format!("{}: {e}", self.tr.t(keys::ERROR_PREFIX)),
                    });
                }
                if let Some(msg) = &self.settings_status {
                    ui.label(msg);
                }
            });
        self.show_settings_modal = open;
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // 투명도 적용
        let mut style = (*ctx.style()).clone();
        style.visuals.window_fill = style.visuals.window_fill.linear_multiply(self.window_alpha);
        style.visuals.panel_fill = style.visuals.panel_fill.linear_multiply(self.window_alpha);
        ctx.set_style(style);

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(self.txt(keys::GUI_APP_TITLE));
                ui.separator();
                if ui.button(self.txt(keys::GUI_SETTINGS)).clicked() {
                    self.show_settings_modal = true;
                }
            });
            self.ui_nav(ui);
        });

        if self.show_settings_modal {
            self.ui_settings(ctx);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| match self.tab {
                    Tab::PressureLoss => self.ui_pressure_loss(ui),
                    Tab::TestDuration => self.ui_test_duration(ui),
                    Tab::Network => self.ui_network(ui),
                });
        });
    }
}
