// ============================================
// src/main.rs (メインファイル)
// ============================================

use std::fs::File;
use std::io::{Result, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

mod app;
mod catalog;
mod error;
mod quiz;
mod settings;
mod signs;
mod timer;
mod ui;

use app::App;
use catalog::{AssetSource, Catalog, DirSource, MemorySource};
use quiz::ChoiceCount;
use settings::Settings;

use crossterm::{
    ExecutableCommand,
    cursor::{Hide, Show},
    event::{self, Event},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};

use ratatui::prelude::*;

// --------------------------------------------------
// コマンドライン
// --------------------------------------------------

#[derive(Parser)]
#[command(name = "roadsign-quiz", version, about = "Name the road sign.")]
struct Cli {
    /// 標識画像のフォルダ (<DIR>/<種類>/<標識>.gif)
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,

    /// 選択肢の数 (3, 6, 9)
    #[arg(long, value_name = "3|6|9")]
    choices: Option<ChoiceCount>,

    /// 設定ファイル (デフォルトは OS の設定ディレクトリ)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// ログの出力先
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// クイズを遊ぶ (デフォルト)
    Play,
    /// 出題対象の標識を一覧表示する
    List,
}

// --------------------------------------------------
// メイン関数 (TUIセットアップと実行ループ)
// --------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Play);

    init_logger(&cli, command)?;

    let config_path = cli.config.clone().unwrap_or_else(Settings::default_path);
    let mut settings = Settings::load(&config_path);
    if let Some(dir) = cli.assets {
        settings.asset_dir = Some(dir);
    }
    if let Some(choices) = cli.choices {
        settings.choices = choices;
    }

    let source: Box<dyn AssetSource> = match &settings.asset_dir {
        Some(dir) => {
            info!("using sign images from {}", dir.display());
            Box::new(DirSource::new(dir))
        }
        None => Box::new(MemorySource::builtin()),
    };

    match command {
        Command::List => list_signs(source.as_ref(), &settings),
        Command::Play => {
            let app = App::new(
                source,
                settings.sign_types(),
                settings.choices,
                StdRng::from_os_rng(),
            );
            let mut terminal = setup_terminal()?;
            let result = run_app(&mut terminal, app);
            restore_terminal(&mut terminal)?;
            result
        }
    }
}

/// ログの初期化。TUI中は画面が崩れるのでファイルに書く
fn init_logger(cli: &Cli, command: Command) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    if command == Command::Play {
        let path = match &cli.log_file {
            Some(path) => path.clone(),
            None => Settings::default_log_path()?,
        };
        let file = File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

/// `list` サブコマンド
fn list_signs(source: &dyn AssetSource, settings: &Settings) -> Result<()> {
    let catalog = Catalog::rebuild(source, &settings.sign_types());
    if catalog.is_empty() {
        eprintln!("no signs found for the enabled sign types");
    }
    for asset in catalog.assets() {
        println!("{}\t{}\t{}", asset.sign_type, asset.id, asset.display_name());
    }
    for failed in catalog.failed_types() {
        eprintln!("could not read sign type '{failed}'");
    }
    Ok(())
}

fn setup_terminal() -> Result<Terminal<impl Backend>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?; // 代替スクリーンを使用
    stdout().execute(Hide)?; // カーソルを非表示
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

fn restore_terminal(_terminal: &mut Terminal<impl Backend>) -> Result<()> {
    stdout().execute(Show)?; // カーソルを再表示
    stdout().execute(LeaveAlternateScreen)?; // 代替スクリーンを終了
    disable_raw_mode()?;
    Ok(())
}

fn run_app(terminal: &mut Terminal<impl Backend>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::ui(f, &app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == event::KeyEventKind::Press {
                    app.handle_key(key.code, Instant::now());
                }
            }
        }

        // 「次の問題へ」の予約と揺れアニメーションを進める
        app.on_tick(Instant::now());

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
