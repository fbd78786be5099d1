// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration between the components.
//!
//! The `App` owns the component states and the services behind them. It
//! feeds messages to the components, turns their effects into tokio tasks,
//! and routes the task results back as messages over an unbounded channel.
//! Component state is only ever touched from the task that calls
//! [`App::dispatch`], so none of it needs locking.

pub mod config;
mod message;
pub mod paths;
mod services;
pub mod session;
mod update;

pub use message::{Flags, Message};
pub use services::Services;

use crate::application::events::{InteractionBus, InteractionEvent};
use crate::application::interacted::InteractedPhotosLoader;
use crate::application::interactions::InteractionService;
use crate::application::port::PhotoSource;
use crate::diagnostics::{DiagnosticsCollector, ExportError};
use crate::domain::photo::PhotoId;
use crate::i18n::I18n;
use crate::ui::notifications::{self, Notification};
use crate::ui::search_bar::Debouncer;
use crate::ui::{gallery, lightbox, search_bar};
use config::Config;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Root application state.
pub struct App {
    pub i18n: I18n,
    config: Config,
    search_bar: search_bar::State,
    debouncer: Debouncer<String>,
    gallery: gallery::State,
    lightbox: lightbox::State,
    notifications: notifications::Manager,
    diagnostics: DiagnosticsCollector,
    photos: Arc<dyn PhotoSource>,
    interactions: InteractionService,
    loader: Arc<InteractedPhotosLoader>,
    invalidations: broadcast::Receiver<InteractionEvent>,
    sender: mpsc::UnboundedSender<Message>,
    receiver: mpsc::UnboundedReceiver<Message>,
    tasks: JoinSet<()>,
    /// Cancels downloads and lookups still running on shutdown.
    shutdown: CancellationToken,
    /// Grid item that had focus before the lightbox opened.
    focused: Option<PhotoId>,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("session", self.interactions.session())
            .field("query", &self.gallery.query())
            .field("category", &self.gallery.category())
            .field("lightbox_open", &self.lightbox.is_open())
            .field("tasks", &self.tasks.len())
            .finish_non_exhaustive()
    }
}

impl App {
    /// Wires the components to `services`.
    ///
    /// `config_warning` is the i18n key returned by [`config::load`], shown
    /// as a warning notification.
    pub fn new(
        config: Config,
        i18n: I18n,
        services: Services,
        config_warning: Option<String>,
    ) -> Self {
        let bus = InteractionBus::new();
        let invalidations = bus.subscribe();
        let interactions = InteractionService::new(services.store, services.session, bus);
        let loader = Arc::new(InteractedPhotosLoader::new(
            services.photos.clone(),
            interactions.clone(),
            config.gallery.batch_size(),
            config.gallery.photo_cache_entries(),
        ));

        let diagnostics = DiagnosticsCollector::new(config.diagnostics.capacity());
        let mut notifications = notifications::Manager::new();
        notifications.set_diagnostics(diagnostics.handle());
        if let Some(key) = config_warning {
            notifications.push(Notification::warning(key));
        }

        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            i18n,
            search_bar: search_bar::State::default(),
            debouncer: Debouncer::new(config.gallery.search_debounce()),
            gallery: gallery::State::new(gallery::Settings::from_config(&config.gallery)),
            lightbox: lightbox::State::new(lightbox::Settings::from_config(&config.lightbox)),
            notifications,
            diagnostics,
            photos: services.photos,
            interactions,
            loader,
            invalidations,
            sender,
            receiver,
            tasks: JoinSet::new(),
            shutdown: CancellationToken::new(),
            focused: None,
            config,
        }
    }

    /// Mounts the gallery, issuing the first page request.
    pub fn start(&mut self) {
        self.dispatch(Message::Gallery(gallery::Message::Mounted));
    }

    /// Processes messages until no task, pending message or debounce is left.
    pub async fn run_until_idle(&mut self) {
        loop {
            self.forward_invalidations();
            if let Ok(message) = self.receiver.try_recv() {
                self.dispatch(message);
                continue;
            }

            let deadline = self.debouncer.deadline();
            if self.tasks.is_empty() && deadline.is_none() {
                break;
            }
            let wake =
                tokio::time::Instant::from_std(deadline.unwrap_or_else(std::time::Instant::now));

            let next = tokio::select! {
                Some(message) = self.receiver.recv() => Some(message),
                Some(joined) = self.tasks.join_next(), if !self.tasks.is_empty() => {
                    if let Err(e) = joined {
                        tracing::error!(error = %e, "background task failed");
                    }
                    None
                }
                () = tokio::time::sleep_until(wake), if deadline.is_some() => {
                    Some(Message::DebounceElapsed)
                }
            };
            if let Some(message) = next {
                self.dispatch(message);
            }
        }
        self.diagnostics.process_pending();
    }

    /// Looks `id` up in the photo API and opens it in the lightbox.
    ///
    /// # Errors
    ///
    /// Returns the photo API error when the lookup fails.
    pub async fn open_photo(&mut self, id: &PhotoId) -> crate::error::Result<()> {
        let photo = self.photos.photo(id, &self.shutdown).await?;
        self.dispatch(Message::Lightbox(lightbox::Message::Open {
            photo,
            return_focus: None,
        }));
        Ok(())
    }

    /// Cancels the in-flight work.
    pub fn shutdown(&mut self) {
        self.gallery.shutdown();
        self.shutdown.cancel();
        self.debouncer.cancel();
    }

    fn forward_invalidations(&mut self) {
        loop {
            match self.invalidations.try_recv() {
                Ok(event) => self.dispatch(Message::Interaction(event)),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "interaction events lagged, reloading");
                    self.reload_interacted();
                }
                Err(_) => break,
            }
        }
    }

    fn reload_interacted(&mut self) {
        if let Some(kind) = self.gallery.category().interaction_kind() {
            self.dispatch(Message::Gallery(gallery::Message::InteractionsChanged(kind)));
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn search_bar(&self) -> &search_bar::State {
        &self.search_bar
    }

    #[must_use]
    pub fn gallery(&self) -> &gallery::State {
        &self.gallery
    }

    #[must_use]
    pub fn lightbox(&self) -> &lightbox::State {
        &self.lightbox
    }

    #[must_use]
    pub fn interactions(&self) -> &InteractionService {
        &self.interactions
    }

    #[must_use]
    pub fn focused(&self) -> Option<&PhotoId> {
        self.focused.as_ref()
    }

    #[must_use]
    pub fn notifications(&self) -> &notifications::Manager {
        &self.notifications
    }

    /// Takes every pending notification, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    #[must_use]
    pub fn diagnostics(&self) -> &DiagnosticsCollector {
        &self.diagnostics
    }

    /// Resolves a notification to display text.
    #[must_use]
    pub fn render_notification(&self, notification: &Notification) -> String {
        let args: Vec<(&str, fluent_bundle::FluentValue<'_>)> = notification
            .message_args()
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str().into()))
            .collect();
        self.i18n.tr_with_args(notification.message_key(), &args)
    }

    /// Writes the diagnostics report into `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if the report cannot be serialized or written.
    pub fn export_diagnostics(&mut self, dir: &Path) -> Result<PathBuf, ExportError> {
        self.diagnostics.process_pending();
        let path = self.diagnostics.export_to_dir(dir)?;
        self.notifications.push(
            Notification::info("notification-diagnostics-exported")
                .with_arg("path", path.display().to_string()),
        );
        Ok(path)
    }
}

