// SPDX-License-Identifier: MPL-2.0
use fluent_bundle::FluentValue;
use mosaic_lens::app::{config, paths, session, App, Flags, Message, Services};
use mosaic_lens::domain::gallery::Category;
use mosaic_lens::domain::photo::PhotoId;
use mosaic_lens::i18n::fluent::I18n;
use mosaic_lens::layout;
use mosaic_lens::ui::gallery::{self, Status};
use mosaic_lens::ui::{lightbox, search_bar};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum Command {
    Browse { pages: u32 },
    Search { query: String, pages: u32 },
    Category { category: Category, pages: u32 },
    Like { id: PhotoId, liked: bool },
    Download { id: PhotoId },
    Session,
}

#[derive(Debug)]
enum UsageError {
    Unknown(String),
    Missing(&'static str),
}

impl Command {
    fn parse(args: &[String]) -> Result<Self, UsageError> {
        let mut args = args.iter().map(String::as_str);
        let name = args.next().unwrap_or("browse");

        match name {
            "browse" => Ok(Command::Browse {
                pages: pages(args.next())?,
            }),
            "search" => Ok(Command::Search {
                query: required(args.next(), "query")?,
                pages: pages(args.next())?,
            }),
            "category" => {
                let raw = required(args.next(), "name")?;
                let category = raw.parse().map_err(|_| UsageError::Unknown(raw))?;
                Ok(Command::Category {
                    category,
                    pages: pages(args.next())?,
                })
            }
            "liked" => Ok(Command::Category {
                category: Category::Liked,
                pages: 1,
            }),
            "downloaded" => Ok(Command::Category {
                category: Category::Downloaded,
                pages: 1,
            }),
            "like" | "unlike" => Ok(Command::Like {
                id: PhotoId::new(required(args.next(), "id")?),
                liked: name == "like",
            }),
            "download" => Ok(Command::Download {
                id: PhotoId::new(required(args.next(), "id")?),
            }),
            "session" => Ok(Command::Session),
            other => Err(UsageError::Unknown(other.to_owned())),
        }
    }
}

fn required(arg: Option<&str>, name: &'static str) -> Result<String, UsageError> {
    arg.map(str::to_owned).ok_or(UsageError::Missing(name))
}

fn pages(arg: Option<&str>) -> Result<u32, UsageError> {
    match arg {
        None => Ok(1),
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| UsageError::Unknown(raw.to_owned())),
    }
}

/// Parsed command line.
struct Cli {
    help: bool,
    flags: Flags,
    width: Option<f32>,
    diagnostics_dir: Option<PathBuf>,
    rest: Vec<String>,
}

impl Cli {
    fn from_env() -> Result<Self, pico_args::Error> {
        let mut args = pico_args::Arguments::from_env();
        let help = args.contains(["-h", "--help"]);
        let flags = Flags {
            lang: args.opt_value_from_str("--lang")?,
            config_dir: args.opt_value_from_str("--config-dir")?,
            data_dir: args.opt_value_from_str("--data-dir")?,
        };
        let width = args.opt_value_from_str("--width")?;
        let diagnostics_dir = args.opt_value_from_str("--diagnostics-dir")?;
        let rest = args
            .finish()
            .into_iter()
            .filter_map(|arg| arg.into_string().ok())
            .collect();
        Ok(Self {
            help,
            flags,
            width,
            diagnostics_dir,
            rest,
        })
    }
}

fn print_usage(i18n: &I18n) {
    eprintln!("{}", i18n.tr("cli-usage"));
    eprintln!("{}", i18n.tr("cli-commands"));
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::from_env() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };
    let Cli {
        help,
        flags,
        width,
        diagnostics_dir,
        rest,
    } = cli;

    paths::init_cli_overrides(flags.data_dir.clone(), flags.config_dir.clone());
    let (mut config, config_warning) = config::load();
    if width.is_some() {
        config.layout.container_width_px = width;
    }
    let i18n = I18n::new(flags.lang.clone(), &config);

    if help {
        print_usage(&i18n);
        return ExitCode::SUCCESS;
    }
    let command = match Command::parse(&rest) {
        Ok(command) => command,
        Err(err) => {
            match err {
                UsageError::Unknown(command) => eprintln!(
                    "{}",
                    i18n.tr_with_args("cli-unknown-command", &[("command", command.into())])
                ),
                UsageError::Missing(name) => eprintln!(
                    "{}",
                    i18n.tr_with_args("cli-missing-argument", &[("name", name.into())])
                ),
            }
            print_usage(&i18n);
            return ExitCode::from(2);
        }
    };

    let session = match session::load_or_create() {
        Ok(session) => session,
        Err(err) => {
            tracing::error!(error = %err, "session could not be restored");
            eprintln!("{}", i18n.tr(err.i18n_key()));
            return ExitCode::FAILURE;
        }
    };
    if let Command::Session = command {
        println!(
            "{}",
            i18n.tr_with_args("session-id", &[("id", session.to_string().into())])
        );
        return ExitCode::SUCCESS;
    }

    let services = match Services::from_config(&config, session) {
        Ok(services) => services,
        Err(err) => {
            tracing::error!(error = %err, "services could not be created");
            eprintln!("{}", i18n.tr(err.i18n_key()));
            return ExitCode::FAILURE;
        }
    };

    let mut app = App::new(config, i18n, services, config_warning);
    let status = run(&mut app, command).await;
    app.shutdown();

    if let Some(dir) = diagnostics_dir {
        if let Err(err) = app.export_diagnostics(&dir) {
            tracing::error!(error = %err, "diagnostics export failed");
        }
    }
    for notification in app.take_notifications() {
        eprintln!("{}", app.render_notification(&notification));
    }
    status
}

async fn run(app: &mut App, command: Command) -> ExitCode {
    match command {
        Command::Browse { pages } => {
            app.start();
            app.run_until_idle().await;
            load_more(app, pages).await;
            print_gallery(app);
        }
        Command::Search { query, pages } => {
            app.dispatch(Message::SearchBar(search_bar::Message::QueryChanged(query)));
            app.dispatch(Message::SearchBar(search_bar::Message::Submit));
            app.run_until_idle().await;
            load_more(app, pages).await;
            print_gallery(app);
        }
        Command::Category { category, pages } => {
            app.dispatch(Message::SearchBar(search_bar::Message::SelectCategory(
                category,
            )));
            app.run_until_idle().await;
            load_more(app, pages).await;
            print_gallery(app);
        }
        Command::Like { id, liked } => {
            if let Err(err) = app.open_photo(&id).await {
                eprintln!("{}", app.i18n.tr(err.i18n_key()));
                return ExitCode::FAILURE;
            }
            app.run_until_idle().await;
            if app.lightbox().is_liked() != liked {
                app.dispatch(Message::Lightbox(lightbox::Message::ToggleLike));
                app.run_until_idle().await;
            }
            println!("{}\t{}", id, app.lightbox().is_liked());
        }
        Command::Download { id } => {
            if let Err(err) = app.open_photo(&id).await {
                eprintln!("{}", app.i18n.tr(err.i18n_key()));
                return ExitCode::FAILURE;
            }
            app.dispatch(Message::Lightbox(lightbox::Message::Download));
            app.run_until_idle().await;
        }
        Command::Session => {}
    }
    ExitCode::SUCCESS
}

/// Requests `pages - 1` further pages the way reaching the grid bottom does.
async fn load_more(app: &mut App, pages: u32) {
    for _ in 1..pages {
        if !app.gallery().has_more() {
            break;
        }
        app.dispatch(Message::Gallery(gallery::Message::Scrolled {
            distance_to_bottom: 0.0,
        }));
        app.dispatch(Message::Gallery(gallery::Message::FrameEnded));
        app.run_until_idle().await;
    }
}

fn print_gallery(app: &App) {
    let i18n = &app.i18n;
    let gallery = app.gallery();
    match gallery.status() {
        Status::Loading => println!("{}", i18n.tr("gallery-loading")),
        Status::Empty(key) => println!("{}", i18n.tr(key)),
        Status::NoResults => println!("{}", i18n.tr("gallery-no-results")),
        Status::Ready => {
            let photos = gallery.displayed();
            let params = gallery.masonry_params(&app.config().layout);
            let grid = layout::layout(&photos, &params);
            println!(
                "{}",
                i18n.tr_with_args("gallery-results", &[("count", FluentValue::from(grid.len()))])
            );
            for (index, column) in grid.columns().iter().enumerate() {
                println!(
                    "{}",
                    i18n.tr_with_args("gallery-column", &[("index", FluentValue::from(index + 1))])
                );
                for photo in &column.photos {
                    let alt = photo.alt_description.as_deref().unwrap_or_default();
                    println!("  {}  {}x{}  {}", photo.id, photo.width, photo.height, alt);
                }
                for height in &column.fillers {
                    let height = format!("{height:.0}");
                    println!(
                        "  {}",
                        i18n.tr_with_args("gallery-placeholder", &[("height", height.into())])
                    );
                }
            }
            if !gallery.has_more() && !gallery.category().is_interacted() {
                println!("{}", i18n.tr("gallery-end"));
            }
        }
    }
}
