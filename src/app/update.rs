// SPDX-License-Identifier: MPL-2.0
//! Message routing and effect execution for the application shell.
//!
//! Components never perform I/O. Their effects are turned into tasks here;
//! each task resolves to a [`Message`] that is sent back to the shell.

use super::{App, Message};
use crate::application::interactions::InteractionService;
use crate::application::port::PhotoSource;
use crate::diagnostics::{AppOperation, DiagnosticsHandle, UserAction};
use crate::domain::photo::Photo;
use crate::error::{Error, Result};
use crate::ui::gallery::{self, Fetched};
use crate::ui::notifications::Notification;
use crate::ui::{lightbox, search_bar};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

#[allow(clippy::cast_possible_truncation)] // Durations in ms fit comfortably in u64
fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

impl App {
    /// Applies one message and starts the work its effects ask for.
    pub fn dispatch(&mut self, message: Message) {
        match message {
            Message::SearchBar(message) => {
                let effect = self.search_bar.handle(message);
                self.run_search_bar_effect(effect);
            }
            Message::DebounceElapsed => {
                if let Some(text) = self.debouncer.poll(Instant::now()) {
                    self.update_gallery(gallery::Message::QueryChanged(text));
                }
            }
            Message::Gallery(message) => self.update_gallery(message),
            Message::Lightbox(message) => {
                if let lightbox::Message::Open { photo, .. } = &message {
                    self.diagnostics.log_action(UserAction::OpenPhoto {
                        photo_id: photo.id.to_string(),
                    });
                }
                let effect = self.lightbox.handle(message);
                self.run_lightbox_effect(effect);
            }
            Message::Notification(message) => self.notifications.handle_message(&message),
            Message::Interaction(event) => {
                self.update_gallery(gallery::Message::InteractionsChanged(event.kind()));
            }
        }
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = Message> + Send + 'static,
    {
        let sender = self.sender.clone();
        self.tasks.spawn(async move {
            // The receiver only goes away with the app itself.
            let _ = sender.send(task.await);
        });
    }

    fn run_search_bar_effect(&mut self, effect: search_bar::Effect) {
        match effect {
            search_bar::Effect::None => {}
            search_bar::Effect::QueryEdited(text) => self.debouncer.push(text, Instant::now()),
            search_bar::Effect::Search(query) => {
                self.debouncer.cancel();
                self.diagnostics.log_action(UserAction::SubmitSearch {
                    query_len: query.chars().count(),
                });
                self.update_gallery(gallery::Message::Search(query));
            }
            search_bar::Effect::CategorySelected(category) => {
                self.debouncer.cancel();
                self.diagnostics.log_action(UserAction::SelectCategory {
                    category: category.to_string(),
                });
                self.update_gallery(gallery::Message::CategorySelected(category));
            }
        }
    }

    fn update_gallery(&mut self, message: gallery::Message) {
        let loaded = matches!(
            &message,
            gallery::Message::PageLoaded { result: Ok(_), .. }
                | gallery::Message::InteractedLoaded { result: Ok(_), .. }
        );
        let effect = self.gallery.handle(message);
        if loaded {
            self.notifications.clear_load_errors();
        }
        self.run_gallery_effect(effect);
    }

    fn run_gallery_effect(&mut self, effect: gallery::Effect) {
        match effect {
            gallery::Effect::None => {}
            gallery::Effect::FetchPage {
                request,
                text,
                page,
                per_page,
                cancel,
            } => {
                if !page.is_first() {
                    self.diagnostics.log_action(UserAction::LoadNextPage { page: page.value() });
                }
                let photos = Arc::clone(&self.photos);
                let diagnostics = self.diagnostics.handle();
                self.spawn(async move {
                    let started = Instant::now();
                    let result = match text.as_deref() {
                        Some(query) => photos
                            .search(query, page, per_page, &cancel)
                            .await
                            .map(Fetched::Search),
                        None => photos
                            .list(page, per_page, &cancel)
                            .await
                            .map(Fetched::Listing),
                    };
                    if let Ok(fetched) = &result {
                        let results = match fetched {
                            Fetched::Listing(list) => list.len(),
                            Fetched::Search(found) => found.results.len(),
                        };
                        diagnostics.log_operation(AppOperation::FetchPage {
                            page: page.value(),
                            results,
                            duration_ms: elapsed_ms(started),
                        });
                    }
                    Message::Gallery(gallery::Message::PageLoaded {
                        request,
                        page,
                        result,
                    })
                });
            }
            gallery::Effect::LoadInteracted {
                request,
                kind,
                cancel,
            } => {
                let loader = Arc::clone(&self.loader);
                let chunks = self.sender.clone();
                let diagnostics = self.diagnostics.handle();
                self.spawn(async move {
                    let started = Instant::now();
                    let result = loader
                        .load(kind, &cancel, |chunk| {
                            let _ = chunks.send(
                                gallery::Message::InteractedChunk {
                                    request,
                                    photos: chunk.to_vec(),
                                }
                                .into(),
                            );
                        })
                        .await
                        .map(|load| load.photos);
                    if let Ok(photos) = &result {
                        diagnostics.log_operation(AppOperation::LoadInteracted {
                            category: kind.as_str().to_string(),
                            results: photos.len(),
                            duration_ms: elapsed_ms(started),
                        });
                    }
                    Message::Gallery(gallery::Message::InteractedLoaded { request, result })
                });
            }
            gallery::Effect::LoadFailed(error) => {
                if !error.is_cancelled() {
                    self.notifications
                        .push(Notification::from_error("notification-load-error", error));
                }
            }
        }
    }

    fn run_lightbox_effect(&mut self, effect: lightbox::Effect) {
        match effect {
            lightbox::Effect::None => {}
            lightbox::Effect::FetchInteraction { seq, image_id } => {
                let interactions = self.interactions.clone();
                self.spawn(async move {
                    let result = interactions.interaction(&image_id).await;
                    Message::Lightbox(lightbox::Message::InteractionLoaded { seq, result })
                });
            }
            lightbox::Effect::PersistLike {
                image_id,
                value,
                burst,
            } => {
                self.diagnostics.log_action(UserAction::ToggleLike {
                    photo_id: image_id.to_string(),
                    liked: value,
                });
                let interactions = self.interactions.clone();
                self.spawn(async move {
                    let result = interactions.set_like(&image_id, value).await;
                    Message::Lightbox(lightbox::Message::LikePersisted {
                        image_id,
                        value,
                        result,
                    })
                });
                if let Some(duration) = burst {
                    self.spawn(async move {
                        tokio::time::sleep(duration).await;
                        Message::Lightbox(lightbox::Message::BurstEnded)
                    });
                }
            }
            lightbox::Effect::LikeFailed(error) => {
                self.notifications
                    .push(Notification::from_error("notification-like-error", error));
            }
            lightbox::Effect::Download(photo) => {
                self.diagnostics.log_action(UserAction::DownloadPhoto {
                    photo_id: photo.id.to_string(),
                });
                let download = Download {
                    photos: Arc::clone(&self.photos),
                    interactions: self.interactions.clone(),
                    dir: self.config.lightbox.resolved_download_dir(),
                    cancel: self.shutdown.child_token(),
                    diagnostics: self.diagnostics.handle(),
                };
                self.spawn(async move {
                    Message::Lightbox(lightbox::Message::Downloaded(download.save(photo).await))
                });
            }
            lightbox::Effect::DownloadSaved(path) => {
                let file = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                self.notifications
                    .push(Notification::success("notification-download-success").with_arg("file", file));
            }
            lightbox::Effect::DownloadFailed(error) => {
                if !error.is_cancelled() {
                    self.notifications
                        .push(Notification::from_error("notification-download-error", error));
                }
            }
            lightbox::Effect::Close { restore_focus } => {
                self.diagnostics.log_action(UserAction::ClosePhoto);
                self.focused = restore_focus;
            }
        }
    }
}

/// Everything a download task needs, detached from the app.
struct Download {
    photos: Arc<dyn PhotoSource>,
    interactions: InteractionService,
    dir: PathBuf,
    cancel: CancellationToken,
    diagnostics: DiagnosticsHandle,
}

impl Download {
    /// Fetches the full-resolution bytes, writes them under the sanitized
    /// `<id>.jpg` name and counts the download. A failing counter is logged;
    /// the file stays.
    async fn save(self, photo: Photo) -> Result<PathBuf> {
        let started = Instant::now();
        let bytes = self.photos.download(&photo, &self.cancel).await?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(photo.download_file_name());
        if path.parent() != Some(self.dir.as_path()) {
            return Err(Error::Io(format!(
                "refusing to write {} outside {}",
                path.display(),
                self.dir.display()
            )));
        }
        tokio::fs::write(&path, &bytes).await?;
        self.diagnostics.log_operation(AppOperation::SaveDownload {
            bytes: bytes.len(),
            duration_ms: elapsed_ms(started),
        });
        tracing::info!(photo_id = %photo.id, path = %path.display(), "photo saved");

        if let Err(e) = self.interactions.increment_download(&photo.id).await {
            tracing::warn!(photo_id = %photo.id, error = %e, "download saved but not counted");
            self.diagnostics.log_error(&e);
        }
        Ok(path)
    }
}
