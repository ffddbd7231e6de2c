// ── Handset driver ──
//
// Wraps a `UssdSession` with the pieces a real phone adds: a host to
// talk to, the gateway pause before every answer, and a `watch` channel
// carrying the current view so a renderer can follow along (including
// the loading frame shown during the pause).

use std::sync::Arc;

use tokio::sync::watch;
use tracing::trace;

use super::host::UssdHost;
use super::latency::{Latency, LatencyProfile};
use super::screen::Screen;
use super::session::{SessionView, UssdSession};
use crate::model::Language;

/// A simulated phone running one USSD session at a time.
pub struct Handset<H: UssdHost + ?Sized> {
    session: UssdSession,
    host: Arc<H>,
    latency: Arc<dyn Latency>,
    profile: LatencyProfile,
    view_tx: watch::Sender<SessionView>,
}

impl<H: UssdHost + ?Sized> Handset<H> {
    pub fn new(host: Arc<H>, latency: Arc<dyn Latency>) -> Self {
        let session = UssdSession::new();
        let (view_tx, _) = watch::channel(session.view(&*host, false));
        Self {
            session,
            host,
            latency,
            profile: LatencyProfile::default(),
            view_tx,
        }
    }

    pub fn with_profile(mut self, profile: LatencyProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.session.set_language(language);
        self.publish(false);
        self
    }

    pub fn session(&self) -> &UssdSession {
        &self.session
    }

    pub fn screen(&self) -> Screen {
        self.session.screen()
    }

    /// Current view, rendered against the host's latest data.
    pub fn view(&self) -> SessionView {
        self.session.view(&*self.host, false)
    }

    /// Follow view changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.view_tx.subscribe()
    }

    // ── Keypad ───────────────────────────────────────────────────────

    pub fn press(&mut self, keys: &str) {
        self.session.press(keys);
        self.publish(false);
    }

    pub fn backspace(&mut self) {
        self.session.backspace();
        self.publish(false);
    }

    pub fn end_call(&mut self) {
        self.session.end_call();
        self.publish(false);
    }

    pub fn set_language(&mut self, language: Language) {
        self.session.set_language(language);
        self.publish(false);
    }

    /// Submit the active buffer after the gateway pause.
    pub async fn send(&mut self) -> SessionView {
        let input = self.session.active_buffer().to_owned();
        let pause = self.session.pause_for(&input);
        let delay = self.profile.duration(pause);

        if !delay.is_zero() {
            trace!(?pause, ?delay, "waiting on gateway");
            self.publish(true);
            self.latency.wait(delay).await;
        }

        self.session.submit(&*self.host, &input);
        self.publish(false)
    }

    /// Type `input` and send it, the way a scripted run replays a session.
    pub async fn enter(&mut self, input: &str) -> SessionView {
        self.press(input);
        self.send().await
    }

    fn publish(&self, loading: bool) -> SessionView {
        let view = self.session.view(&*self.host, loading);
        self.view_tx.send_replace(view.clone());
        view
    }
}
