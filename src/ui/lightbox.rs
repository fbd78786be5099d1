// SPDX-License-Identifier: MPL-2.0
//! Enlarged photo view with like, download and hover zoom.
//!
//! The like button is optimistic: a toggle shows the new value at once and
//! keeps the previous one in [`LikeState::Tentative`] until the store
//! answers. While a toggle is pending further toggles are ignored.
//!
//! Every open bumps a load sequence number. The stored interaction fetched
//! on open is applied only if its sequence is still current and the user
//! has not toggled in the meantime, so a slow read never overwrites a click.

use crate::app::config::{LightboxConfig, DEFAULT_LIKE_BURST_MS, DEFAULT_ZOOM_MIN_VIEWPORT_PX};
use crate::domain::interaction::Interaction;
use crate::domain::photo::{Photo, PhotoId};
use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Like value shown by the lightbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeState {
    Confirmed(bool),
    /// Shown optimistically until persistence answers.
    Tentative { value: bool, previous: bool },
}

impl LikeState {
    /// Value currently displayed.
    #[must_use]
    pub fn shown(self) -> bool {
        match self {
            LikeState::Confirmed(value) | LikeState::Tentative { value, .. } => value,
        }
    }

    #[must_use]
    pub fn is_pending(self) -> bool {
        matches!(self, LikeState::Tentative { .. })
    }
}

/// Focusable controls, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Close,
    Like,
    Download,
}

impl Focus {
    const ORDER: [Focus; 3] = [Focus::Close, Focus::Like, Focus::Download];

    fn step(self, backwards: bool) -> Self {
        let len = Self::ORDER.len();
        let index = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        let next = if backwards {
            (index + len - 1) % len
        } else {
            (index + 1) % len
        };
        Self::ORDER[next]
    }
}

/// Image rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Hover zoom transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom {
    pub active: bool,
    pub scale: f32,
    /// Transform origin as percentages of the image rect.
    pub origin: (f32, f32),
}

impl Default for Zoom {
    fn default() -> Self {
        Self {
            active: false,
            scale: 1.0,
            origin: (50.0, 50.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub reduced_motion: bool,
    pub zoom_factor: f32,
    /// Narrower viewports never zoom.
    pub zoom_min_viewport: f32,
    pub burst: Duration,
}

impl Settings {
    #[must_use]
    pub fn from_config(config: &LightboxConfig) -> Self {
        Self {
            reduced_motion: config.reduced_motion(),
            zoom_factor: config.hover_zoom_factor(),
            zoom_min_viewport: DEFAULT_ZOOM_MIN_VIEWPORT_PX,
            burst: Duration::from_millis(DEFAULT_LIKE_BURST_MS),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_config(&LightboxConfig::default())
    }
}

/// Lightbox state. Closed when no photo is shown.
#[derive(Debug, Clone)]
pub struct State {
    settings: Settings,
    photo: Option<Photo>,
    load_seq: u64,
    user_interacted: bool,
    like: LikeState,
    burst: bool,
    zoom: Zoom,
    focus: Focus,
    restore_focus: Option<PhotoId>,
    downloading: bool,
}

#[derive(Debug, Clone)]
pub enum Message {
    Open {
        photo: Photo,
        /// Grid item to focus again once closed.
        return_focus: Option<PhotoId>,
    },
    InteractionLoaded {
        seq: u64,
        result: Result<Option<Interaction>>,
    },
    ToggleLike,
    LikePersisted {
        image_id: PhotoId,
        value: bool,
        result: Result<()>,
    },
    BurstEnded,
    Download,
    Downloaded(Result<PathBuf>),
    PointerEntered { viewport_width: f32 },
    PointerMoved { x: f32, y: f32, rect: Rect },
    PointerLeft,
    Tab { shift: bool },
    Escape,
    BackdropClicked,
}

#[derive(Debug, Clone)]
pub enum Effect {
    None,
    FetchInteraction { seq: u64, image_id: PhotoId },
    /// Persist the like; `burst` is how long the burst animation runs.
    PersistLike {
        image_id: PhotoId,
        value: bool,
        burst: Option<Duration>,
    },
    /// Persistence failed and the like was reverted.
    LikeFailed(Error),
    Download(Photo),
    DownloadSaved(PathBuf),
    DownloadFailed(Error),
    Close { restore_focus: Option<PhotoId> },
}

impl Default for State {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl State {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            photo: None,
            load_seq: 0,
            user_interacted: false,
            like: LikeState::Confirmed(false),
            burst: false,
            zoom: Zoom::default(),
            focus: Focus::Close,
            restore_focus: None,
            downloading: false,
        }
    }

    pub fn handle(&mut self, message: Message) -> Effect {
        match message {
            Message::Open {
                photo,
                return_focus,
            } => {
                self.load_seq += 1;
                self.user_interacted = false;
                self.like = LikeState::Confirmed(false);
                self.burst = false;
                self.zoom = Zoom::default();
                self.focus = Focus::Close;
                self.restore_focus = return_focus;
                self.downloading = false;
                let image_id = photo.id.clone();
                self.photo = Some(photo);
                Effect::FetchInteraction {
                    seq: self.load_seq,
                    image_id,
                }
            }
            Message::InteractionLoaded { seq, result } => {
                if seq != self.load_seq || self.user_interacted || self.photo.is_none() {
                    return Effect::None;
                }
                match result {
                    Ok(found) => {
                        let liked = found.is_some_and(|row| row.likes.is_liked());
                        self.like = LikeState::Confirmed(liked);
                    }
                    Err(e) => tracing::warn!(error = %e, "failed to read like state"),
                }
                Effect::None
            }
            Message::ToggleLike => self.toggle_like(),
            Message::LikePersisted {
                image_id,
                value,
                result,
            } => {
                let current = self.photo.as_ref().is_some_and(|p| p.id == image_id);
                let LikeState::Tentative { previous, .. } = self.like else {
                    return Effect::None;
                };
                if !current {
                    return Effect::None;
                }
                match result {
                    Ok(()) => {
                        self.like = LikeState::Confirmed(value);
                        Effect::None
                    }
                    Err(e) => {
                        tracing::error!(image_id = %image_id, error = %e, "failed to persist like");
                        self.like = LikeState::Confirmed(previous);
                        self.burst = false;
                        Effect::LikeFailed(e)
                    }
                }
            }
            Message::BurstEnded => {
                self.burst = false;
                Effect::None
            }
            Message::Download => match &self.photo {
                Some(photo) if !self.downloading => {
                    self.downloading = true;
                    Effect::Download(photo.clone())
                }
                _ => Effect::None,
            },
            Message::Downloaded(result) => {
                self.downloading = false;
                match result {
                    Ok(path) => Effect::DownloadSaved(path),
                    Err(e) => Effect::DownloadFailed(e),
                }
            }
            Message::PointerEntered { viewport_width } => {
                if viewport_width >= self.settings.zoom_min_viewport {
                    self.zoom.active = true;
                    self.zoom.scale = if self.settings.reduced_motion {
                        1.0
                    } else {
                        self.settings.zoom_factor
                    };
                }
                Effect::None
            }
            Message::PointerMoved { x, y, rect } => {
                if self.zoom.active && rect.width > 0.0 && rect.height > 0.0 {
                    let px = ((x - rect.x) / rect.width * 100.0).clamp(0.0, 100.0);
                    let py = ((y - rect.y) / rect.height * 100.0).clamp(0.0, 100.0);
                    self.zoom.origin = (px, py);
                }
                Effect::None
            }
            Message::PointerLeft => {
                self.zoom = Zoom::default();
                Effect::None
            }
            Message::Tab { shift } => {
                if self.photo.is_some() {
                    self.focus = self.focus.step(shift);
                }
                Effect::None
            }
            Message::Escape | Message::BackdropClicked => self.close(),
        }
    }

    fn toggle_like(&mut self) -> Effect {
        let Some(photo) = &self.photo else {
            return Effect::None;
        };
        if self.like.is_pending() {
            return Effect::None;
        }
        self.user_interacted = true;
        let previous = self.like.shown();
        let value = !previous;
        self.like = LikeState::Tentative { value, previous };

        let burst = (value && !self.settings.reduced_motion).then_some(self.settings.burst);
        self.burst = burst.is_some();
        Effect::PersistLike {
            image_id: photo.id.clone(),
            value,
            burst,
        }
    }

    fn close(&mut self) -> Effect {
        if self.photo.take().is_none() {
            return Effect::None;
        }
        // Late interaction reads for this photo no longer apply.
        self.load_seq += 1;
        self.zoom = Zoom::default();
        self.burst = false;
        self.focus = Focus::Close;
        Effect::Close {
            restore_focus: self.restore_focus.take(),
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.photo.is_some()
    }

    #[must_use]
    pub fn photo(&self) -> Option<&Photo> {
        self.photo.as_ref()
    }

    #[must_use]
    pub fn like(&self) -> LikeState {
        self.like
    }

    #[must_use]
    pub fn is_liked(&self) -> bool {
        self.like.shown()
    }

    #[must_use]
    pub fn is_bursting(&self) -> bool {
        self.burst
    }

    #[must_use]
    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    #[must_use]
    pub fn focus(&self) -> Focus {
        self.focus
    }

    #[must_use]
    pub fn is_downloading(&self) -> bool {
        self.downloading
    }

    #[must_use]
    pub fn load_seq(&self) -> u64 {
        self.load_seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::interaction::{DownloadCount, LikeFlag, RowId};
    use crate::test_utils::{assert_abs_diff_eq, photo, F32_EPSILON};

    fn opened(settings: Settings) -> (State, u64) {
        let mut lightbox = State::new(settings);
        let effect = lightbox.handle(Message::Open {
            photo: photo("p1", 800, 600),
            return_focus: Some(PhotoId::new("p1")),
        });
        let Effect::FetchInteraction { seq, image_id } = effect else {
            panic!("expected an interaction fetch");
        };
        assert_eq!(image_id.as_str(), "p1");
        (lightbox, seq)
    }

    fn liked_row() -> Interaction {
        Interaction {
            row_id: RowId(1),
            likes: LikeFlag::LIKED,
            downloads: DownloadCount::ZERO,
        }
    }

    #[test]
    fn stored_like_is_applied_on_open() {
        let (mut lightbox, seq) = opened(Settings::default());
        lightbox.handle(Message::InteractionLoaded {
            seq,
            result: Ok(Some(liked_row())),
        });
        assert!(lightbox.is_liked());
    }

    #[test]
    fn stale_sequence_is_ignored() {
        let (mut lightbox, seq) = opened(Settings::default());
        lightbox.handle(Message::Open {
            photo: photo("p2", 10, 10),
            return_focus: None,
        });
        lightbox.handle(Message::InteractionLoaded {
            seq,
            result: Ok(Some(liked_row())),
        });
        assert!(!lightbox.is_liked());
    }

    #[test]
    fn late_read_never_overrides_a_click() {
        let (mut lightbox, seq) = opened(Settings::default());
        lightbox.handle(Message::ToggleLike);
        lightbox.handle(Message::LikePersisted {
            image_id: PhotoId::new("p1"),
            value: true,
            result: Ok(()),
        });
        lightbox.handle(Message::InteractionLoaded {
            seq,
            result: Ok(None),
        });
        assert_eq!(lightbox.like(), LikeState::Confirmed(true));
    }

    #[test]
    fn toggle_is_optimistic_and_starts_the_burst() {
        let (mut lightbox, _) = opened(Settings::default());
        let effect = lightbox.handle(Message::ToggleLike);

        match effect {
            Effect::PersistLike { value, burst, .. } => {
                assert!(value);
                assert_eq!(burst, Some(Duration::from_millis(520)));
            }
            other => panic!("unexpected effect {other:?}"),
        }
        assert_eq!(
            lightbox.like(),
            LikeState::Tentative {
                value: true,
                previous: false
            }
        );
        assert!(lightbox.is_bursting());
    }

    #[test]
    fn toggle_while_pending_is_ignored() {
        let (mut lightbox, _) = opened(Settings::default());
        lightbox.handle(Message::ToggleLike);
        assert!(matches!(lightbox.handle(Message::ToggleLike), Effect::None));
        assert!(lightbox.is_liked());
    }

    #[test]
    fn failed_persistence_reverts() {
        let (mut lightbox, _) = opened(Settings::default());
        lightbox.handle(Message::ToggleLike);
        let effect = lightbox.handle(Message::LikePersisted {
            image_id: PhotoId::new("p1"),
            value: true,
            result: Err(Error::Http("offline".into())),
        });

        assert!(matches!(effect, Effect::LikeFailed(_)));
        assert_eq!(lightbox.like(), LikeState::Confirmed(false));
        assert!(!lightbox.is_bursting());

        // A new toggle is accepted again.
        assert!(matches!(
            lightbox.handle(Message::ToggleLike),
            Effect::PersistLike { .. }
        ));
    }

    #[test]
    fn reduced_motion_skips_burst_and_scaling() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let (mut lightbox, _) = opened(settings);

        let Effect::PersistLike { burst, .. } = lightbox.handle(Message::ToggleLike) else {
            panic!("expected a like persist");
        };
        assert_eq!(burst, None);

        lightbox.handle(Message::PointerEntered {
            viewport_width: 1440.0,
        });
        assert!(lightbox.zoom().active);
        assert_abs_diff_eq!(lightbox.zoom().scale, 1.0, epsilon = F32_EPSILON);
    }

    #[test]
    fn unliking_has_no_burst() {
        let (mut lightbox, seq) = opened(Settings::default());
        lightbox.handle(Message::InteractionLoaded {
            seq,
            result: Ok(Some(liked_row())),
        });
        let Effect::PersistLike { value, burst, .. } = lightbox.handle(Message::ToggleLike) else {
            panic!("expected a like persist");
        };
        assert!(!value);
        assert_eq!(burst, None);
    }

    #[test]
    fn zoom_follows_the_pointer_on_wide_viewports() {
        let (mut lightbox, _) = opened(Settings::default());
        lightbox.handle(Message::PointerEntered {
            viewport_width: 1280.0,
        });
        assert_abs_diff_eq!(lightbox.zoom().scale, 2.0, epsilon = F32_EPSILON);

        let rect = Rect {
            x: 100.0,
            y: 50.0,
            width: 400.0,
            height: 200.0,
        };
        lightbox.handle(Message::PointerMoved {
            x: 200.0,
            y: 200.0,
            rect,
        });
        let (ox, oy) = lightbox.zoom().origin;
        assert_abs_diff_eq!(ox, 25.0, epsilon = F32_EPSILON);
        assert_abs_diff_eq!(oy, 75.0, epsilon = F32_EPSILON);

        lightbox.handle(Message::PointerMoved {
            x: 900.0,
            y: 0.0,
            rect,
        });
        assert_eq!(lightbox.zoom().origin, (100.0, 0.0));

        lightbox.handle(Message::PointerLeft);
        assert_eq!(lightbox.zoom(), Zoom::default());
    }

    #[test]
    fn narrow_viewports_never_zoom() {
        let (mut lightbox, _) = opened(Settings::default());
        lightbox.handle(Message::PointerEntered {
            viewport_width: 1023.0,
        });
        assert!(!lightbox.zoom().active);
    }

    #[test]
    fn tab_wraps_within_the_controls() {
        let (mut lightbox, _) = opened(Settings::default());
        assert_eq!(lightbox.focus(), Focus::Close);

        lightbox.handle(Message::Tab { shift: true });
        assert_eq!(lightbox.focus(), Focus::Download);
        lightbox.handle(Message::Tab { shift: false });
        assert_eq!(lightbox.focus(), Focus::Close);
        lightbox.handle(Message::Tab { shift: false });
        assert_eq!(lightbox.focus(), Focus::Like);
    }

    #[test]
    fn escape_closes_and_restores_focus() {
        let (mut lightbox, _) = opened(Settings::default());
        match lightbox.handle(Message::Escape) {
            Effect::Close { restore_focus } => {
                assert_eq!(restore_focus, Some(PhotoId::new("p1")));
            }
            other => panic!("unexpected effect {other:?}"),
        }
        assert!(!lightbox.is_open());
        assert!(matches!(
            lightbox.handle(Message::BackdropClicked),
            Effect::None
        ));
    }

    #[test]
    fn download_is_not_started_twice() {
        let (mut lightbox, _) = opened(Settings::default());
        assert!(matches!(
            lightbox.handle(Message::Download),
            Effect::Download(_)
        ));
        assert!(matches!(lightbox.handle(Message::Download), Effect::None));

        let effect = lightbox.handle(Message::Downloaded(Ok(PathBuf::from("/tmp/p1.jpg"))));
        assert!(matches!(effect, Effect::DownloadSaved(_)));
        assert!(!lightbox.is_downloading());
    }
}
