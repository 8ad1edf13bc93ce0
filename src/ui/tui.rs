//! Routed TUI: one view per page of the hub, drawn with ratatui.
//!
//! The event loop owns every piece of mutable state. Network work runs on
//! spawned tasks that report back over a single unbounded channel, so the
//! loop never blocks on I/O; the channel is drained once per frame before
//! input is polled.

use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tracing::info;

use crate::analytics::Analytics;
use crate::auth::{GateState, IdentityProvider, SessionGate, UserSession};
use crate::blog::{BlogClient, BlogPost};
use crate::chat::{self, ChatState, Speaker};
use crate::config::AppConfig;
use crate::contact::{ContactClient, ContactForm};
use crate::panel::{self, DispatchOutcome, PanelState};
use crate::provider::GenerationProvider;
use crate::registry;
use crate::theme::{self, Theme};
use crate::ui::{markdown, UiExitAction};

const POLL_INTERVAL_MS: u64 = 100;
const TOAST_TICKS: u8 = 25;
const MIN_INPUT_ROWS: u16 = 3;
const MAX_INPUT_ROWS: u16 = 12;

// ── Views ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum View {
    Home,
    Tools,
    Chat,
    Blog,
    Contact,
}

impl View {
    const ALL: [View; 5] = [View::Home, View::Tools, View::Chat, View::Blog, View::Contact];

    fn title(self) -> &'static str {
        match self {
            View::Home => "Home",
            View::Tools => "AI Tools",
            View::Chat => "Chat",
            View::Blog => "Blog",
            View::Contact => "Contact",
        }
    }

    fn screen_name(self) -> &'static str {
        match self {
            View::Home => "home",
            View::Tools => "tools",
            View::Chat => "chat",
            View::Blog => "blog",
            View::Contact => "contact",
        }
    }
}

// ── Background completions ──────────────────────────────────

enum UiEvent {
    GateResolved(Option<UserSession>),
    AuthFinished(Result<UserSession, String>),
    ToolFinished {
        generation: u64,
        outcome: DispatchOutcome,
    },
    ChatFinished(String),
    BlogFinished(Result<Vec<BlogPost>, String>),
    ContactFinished(Result<(), String>),
}

// ── Small state holders ─────────────────────────────────────

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

struct Toast {
    text: String,
    error: bool,
    ticks: u8,
}

#[derive(PartialEq, Eq, Clone, Copy)]
enum ToolsFocus {
    List,
    Input,
}

#[derive(PartialEq, Eq, Clone, Copy)]
enum AuthMode {
    SignIn,
    SignUp,
}

#[derive(PartialEq, Eq, Clone, Copy)]
enum AuthField {
    Email,
    Password,
}

struct AuthModal {
    visible: bool,
    mode: AuthMode,
    field: AuthField,
    email: String,
    password: String,
    busy: bool,
    error: Option<String>,
}

impl AuthModal {
    fn new() -> Self {
        Self {
            visible: false,
            mode: AuthMode::SignIn,
            field: AuthField::Email,
            email: String::new(),
            password: String::new(),
            busy: false,
            error: None,
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn active_field(&mut self) -> &mut String {
        match self.field {
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
        }
    }
}

enum BlogView {
    Unconfigured,
    NotLoaded,
    Loading,
    Loaded(Vec<BlogPost>),
    Failed(String),
}

#[derive(PartialEq, Eq, Clone, Copy)]
enum ContactField {
    Name,
    Email,
    Subject,
    Message,
}

impl ContactField {
    fn next(self) -> Self {
        match self {
            ContactField::Name => ContactField::Email,
            ContactField::Email => ContactField::Subject,
            ContactField::Subject => ContactField::Message,
            ContactField::Message => ContactField::Name,
        }
    }
}

// ── App ─────────────────────────────────────────────────────

pub struct App {
    theme: Theme,
    provider: Arc<dyn GenerationProvider>,
    identity: Option<Arc<dyn IdentityProvider>>,
    analytics: Arc<Analytics>,
    blog_client: Option<Arc<BlogClient>>,
    contact_client: Option<Arc<ContactClient>>,

    view: View,
    gate: SessionGate,
    auth: AuthModal,

    panel: PanelState,
    tools_focus: ToolsFocus,
    tool_cursor: usize,
    input_rows: u16,
    output_scroll: u16,

    chat: ChatState,
    chat_scroll: u16,

    blog: BlogView,
    blog_cursor: usize,
    blog_expanded: bool,

    contact_form: ContactForm,
    contact_field: ContactField,
    contact_busy: bool,
    contact_status: Option<(String, bool)>,

    toast: Option<Toast>,

    tx: tokio::sync::mpsc::UnboundedSender<UiEvent>,
    rx: tokio::sync::mpsc::UnboundedReceiver<UiEvent>,
}

impl App {
    pub fn new(
        config: &AppConfig,
        theme: Theme,
        provider: Arc<dyn GenerationProvider>,
        identity: Option<Arc<dyn IdentityProvider>>,
        analytics: Arc<Analytics>,
        start_view: View,
    ) -> Self {
        let blog_client = match (&config.blog.api_key, &config.blog.blog_id) {
            (Some(key), Some(id)) if !key.is_empty() && !id.is_empty() => {
                Some(Arc::new(BlogClient::new(key.clone(), id.clone())))
            }
            _ => None,
        };
        let contact_client = config
            .contact
            .relay_url
            .as_ref()
            .filter(|u| !u.is_empty())
            .map(|u| Arc::new(ContactClient::new(u.clone())));

        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

        Self {
            theme,
            provider,
            identity,
            analytics,
            blog: if blog_client.is_some() {
                BlogView::NotLoaded
            } else {
                BlogView::Unconfigured
            },
            blog_client,
            contact_client,
            view: start_view,
            gate: SessionGate::new(),
            auth: AuthModal::new(),
            panel: PanelState::new(),
            tools_focus: ToolsFocus::List,
            tool_cursor: 0,
            input_rows: 5,
            output_scroll: 0,
            chat: ChatState::new(),
            chat_scroll: 0,
            blog_cursor: 0,
            blog_expanded: false,
            contact_form: ContactForm::default(),
            contact_field: ContactField::Name,
            contact_busy: false,
            contact_status: None,
            toast: None,
            tx,
            rx,
        }
    }

    pub async fn run(mut self) -> Result<UiExitAction> {
        let mut terminal = ratatui::init();
        let _guard = TerminalGuard;

        self.query_session();
        self.analytics.track_screen_view(self.view.screen_name());
        if self.view == View::Blog {
            self.load_blog();
        }

        let exit_action;
        loop {
            terminal.draw(|f| self.draw(f))?;

            while let Ok(evt) = self.rx.try_recv() {
                self.handle_ui_event(evt);
            }

            if let Some(toast) = &mut self.toast {
                toast.ticks = toast.ticks.saturating_sub(1);
            }
            if self.toast.as_ref().is_some_and(|t| t.ticks == 0) {
                self.toast = None;
            }

            if event::poll(std::time::Duration::from_millis(POLL_INTERVAL_MS))? {
                if let Event::Key(key) = event::read()? {
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        exit_action = UiExitAction::Quit;
                        break;
                    }
                    self.handle_key(key);
                }
            }
        }

        drop(_guard);
        Ok(exit_action)
    }

    // ── Background work ─────────────────────────────────────

    fn query_session(&mut self) {
        match &self.identity {
            Some(identity) => {
                let identity = Arc::clone(identity);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    // A failed query counts as "no user"; the gate must not
                    // stay loading forever.
                    let session = identity.session().await.unwrap_or_default();
                    let _ = tx.send(UiEvent::GateResolved(session));
                });
            }
            None => self.gate.resolve(None),
        }
    }

    fn submit_tool(&mut self) {
        match self.panel.begin_submit() {
            None => {}
            Some(Err(rejection)) => self.panel.apply_rejection(&rejection),
            Some(Ok(submission)) => {
                let provider = Arc::clone(&self.provider);
                let tx = self.tx.clone();
                self.output_scroll = 0;
                tokio::spawn(async move {
                    // dispatch() folds every failure into an outcome, so a
                    // completion is sent on all paths and the in-flight flag
                    // always clears.
                    let outcome =
                        panel::dispatch(provider, submission.tool, &submission.input).await;
                    let _ = tx.send(UiEvent::ToolFinished {
                        generation: submission.generation,
                        outcome,
                    });
                });
            }
        }
    }

    fn submit_chat(&mut self) {
        if let Some(prompt) = self.chat.begin_send() {
            let provider = Arc::clone(&self.provider);
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let reply = chat::chat_reply(provider, &prompt).await;
                let _ = tx.send(UiEvent::ChatFinished(reply));
            });
        }
    }

    fn submit_auth(&mut self) {
        let Some(identity) = self.identity.clone() else {
            self.auth.error = Some("Identity provider is not configured.".to_string());
            return;
        };
        if self.auth.busy || self.auth.email.trim().is_empty() || self.auth.password.is_empty() {
            return;
        }
        self.auth.busy = true;
        self.auth.error = None;
        let mode = self.auth.mode;
        let email = self.auth.email.clone();
        let password = self.auth.password.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = match mode {
                AuthMode::SignIn => identity.sign_in(&email, &password).await,
                AuthMode::SignUp => identity.sign_up(&email, &password).await,
            };
            let _ = tx.send(UiEvent::AuthFinished(result.map_err(|e| e.to_string())));
        });
    }

    fn sign_out(&mut self) {
        let Some(user) = self.gate.state().user().cloned() else {
            return;
        };
        // The gate flips immediately; revocation runs in the background.
        self.gate.signed_out();
        self.show_toast("Signed out", false);
        if let Some(identity) = self.identity.clone() {
            tokio::spawn(async move {
                let _ = identity.sign_out(&user.access_token).await;
            });
        }
    }

    fn load_blog(&mut self) {
        let Some(client) = self.blog_client.clone() else {
            return;
        };
        if matches!(self.blog, BlogView::Loading) {
            return;
        }
        self.blog = BlogView::Loading;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.fetch_posts().await.map_err(|e| e.to_string());
            let _ = tx.send(UiEvent::BlogFinished(result));
        });
    }

    fn submit_contact(&mut self) {
        let Some(client) = self.contact_client.clone() else {
            return;
        };
        if self.contact_busy {
            return;
        }
        if !self.contact_form.is_complete() {
            self.contact_status = Some(("All fields are required.".to_string(), true));
            return;
        }
        self.contact_busy = true;
        self.contact_status = None;
        let form = self.contact_form.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.send(&form).await.map_err(|e| e.to_string());
            let _ = tx.send(UiEvent::ContactFinished(result));
        });
    }

    fn handle_ui_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::GateResolved(session) => self.gate.resolve(session),
            UiEvent::AuthFinished(result) => {
                self.auth.busy = false;
                match result {
                    Ok(user) => {
                        info!(email = %user.email, "signed in");
                        self.gate.signed_in(user);
                        self.auth.reset();
                        self.show_toast("Signed in", false);
                    }
                    Err(message) => self.auth.error = Some(message),
                }
            }
            UiEvent::ToolFinished {
                generation,
                outcome,
            } => self.panel.complete(generation, outcome),
            UiEvent::ChatFinished(reply) => {
                self.chat.complete(reply);
                self.chat_scroll = u16::MAX; // clamped to the bottom on draw
            }
            UiEvent::BlogFinished(result) => {
                self.blog = match result {
                    Ok(posts) => {
                        self.blog_cursor = 0;
                        self.blog_expanded = false;
                        BlogView::Loaded(posts)
                    }
                    Err(message) => BlogView::Failed(message),
                };
            }
            UiEvent::ContactFinished(result) => {
                self.contact_busy = false;
                match result {
                    Ok(()) => {
                        self.contact_form.clear();
                        self.contact_field = ContactField::Name;
                        self.contact_status =
                            Some(("Message sent. Thank you!".to_string(), false));
                        self.show_toast("Message sent", false);
                    }
                    Err(message) => {
                        self.contact_status =
                            Some((format!("Failed to send: {}", message), true));
                    }
                }
            }
        }
    }

    // ── Input handling ──────────────────────────────────────

    fn switch_view(&mut self, view: View) {
        if self.view == view {
            return;
        }
        self.view = view;
        self.analytics.track_screen_view(view.screen_name());
        if view == View::Blog && matches!(self.blog, BlogView::NotLoaded) {
            self.load_blog();
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::F(1) => return self.switch_view(View::Home),
            KeyCode::F(2) => return self.switch_view(View::Tools),
            KeyCode::F(3) => return self.switch_view(View::Chat),
            KeyCode::F(4) => return self.switch_view(View::Blog),
            KeyCode::F(5) => return self.switch_view(View::Contact),
            KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.theme = self.theme.toggled();
                theme::save_preference(self.theme);
                return;
            }
            _ => {}
        }

        match self.view {
            View::Home => {}
            View::Tools => self.handle_tools_key(key),
            View::Chat => self.handle_chat_key(key),
            View::Blog => self.handle_blog_key(key),
            View::Contact => self.handle_contact_key(key),
        }
    }

    fn handle_tools_key(&mut self, key: KeyEvent) {
        if self.auth.visible {
            return self.handle_auth_key(key);
        }

        match self.gate.state().clone() {
            GateState::Loading => {}
            GateState::Unauthenticated => {
                if key.code == KeyCode::Enter {
                    self.auth.visible = true;
                }
            }
            GateState::Authenticated(_) => self.handle_panel_key(key),
        }
    }

    fn handle_panel_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::F(8) => self.sign_out(),
            KeyCode::Tab => {
                self.tools_focus = match self.tools_focus {
                    ToolsFocus::List => ToolsFocus::Input,
                    ToolsFocus::Input => ToolsFocus::List,
                };
            }
            KeyCode::Up if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input_rows = (self.input_rows + 1).min(MAX_INPUT_ROWS);
            }
            KeyCode::Down if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input_rows = self.input_rows.saturating_sub(1).max(MIN_INPUT_ROWS);
            }
            KeyCode::Up if self.tools_focus == ToolsFocus::List => {
                self.tool_cursor = self.tool_cursor.saturating_sub(1);
            }
            KeyCode::Down if self.tools_focus == ToolsFocus::List => {
                if self.tool_cursor + 1 < registry::all().len() {
                    self.tool_cursor += 1;
                }
            }
            KeyCode::Enter if self.tools_focus == ToolsFocus::List => {
                let tool = &registry::all()[self.tool_cursor];
                self.panel.select_tool(tool.id);
                self.output_scroll = 0;
                self.tools_focus = ToolsFocus::Input;
            }
            KeyCode::Enter
                if self.tools_focus == ToolsFocus::Input
                    && key.modifiers.contains(KeyModifiers::ALT) =>
            {
                self.panel.input.push('\n');
            }
            KeyCode::Enter if self.tools_focus == ToolsFocus::Input => self.submit_tool(),
            KeyCode::Char('y') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.copy_output();
            }
            KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.panel.clear_output();
                self.output_scroll = 0;
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.save_output_image();
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.panel.input.clear();
            }
            KeyCode::PageUp => self.output_scroll = self.output_scroll.saturating_sub(5),
            KeyCode::PageDown => self.output_scroll = self.output_scroll.saturating_add(5),
            KeyCode::Backspace if self.tools_focus == ToolsFocus::Input => {
                self.panel.input.pop();
            }
            KeyCode::Char(c)
                if self.tools_focus == ToolsFocus::Input
                    && !key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.panel.input.push(c);
            }
            _ => {}
        }
    }

    fn handle_auth_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.auth.reset(),
            KeyCode::Tab => {
                self.auth.field = match self.auth.field {
                    AuthField::Email => AuthField::Password,
                    AuthField::Password => AuthField::Email,
                };
            }
            KeyCode::F(6) => {
                self.auth.mode = match self.auth.mode {
                    AuthMode::SignIn => AuthMode::SignUp,
                    AuthMode::SignUp => AuthMode::SignIn,
                };
                self.auth.error = None;
            }
            KeyCode::Char('g') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(identity) = self.identity.clone() {
                    let url = identity.oauth_url();
                    if webbrowser::open(&url).is_ok() {
                        self.show_toast("Continue sign-in in your browser", false);
                    } else {
                        self.auth.error = Some(format!("Open this URL to sign in: {}", url));
                    }
                }
            }
            KeyCode::Enter => self.submit_auth(),
            KeyCode::Backspace => {
                self.auth.active_field().pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.auth.active_field().push(c);
            }
            _ => {}
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
                self.chat.input.push('\n');
            }
            KeyCode::Enter => self.submit_chat(),
            KeyCode::Backspace => {
                self.chat.input.pop();
            }
            KeyCode::PageUp => self.chat_scroll = self.chat_scroll.saturating_sub(5),
            KeyCode::PageDown => self.chat_scroll = self.chat_scroll.saturating_add(5),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.chat.input.push(c);
            }
            _ => {}
        }
    }

    fn handle_blog_key(&mut self, key: KeyEvent) {
        let post_count = match &self.blog {
            BlogView::Loaded(posts) => posts.len(),
            _ => 0,
        };
        match key.code {
            KeyCode::Char('r') => self.load_blog(),
            KeyCode::Up => {
                self.blog_cursor = self.blog_cursor.saturating_sub(1);
                self.blog_expanded = false;
            }
            KeyCode::Down => {
                if self.blog_cursor + 1 < post_count {
                    self.blog_cursor += 1;
                    self.blog_expanded = false;
                }
            }
            KeyCode::Enter if post_count > 0 => {
                self.blog_expanded = !self.blog_expanded;
            }
            _ => {}
        }
    }

    fn handle_contact_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => self.contact_field = self.contact_field.next(),
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
                if self.contact_field == ContactField::Message {
                    self.contact_form.message.push('\n');
                }
            }
            KeyCode::Enter => self.submit_contact(),
            KeyCode::Backspace => {
                self.contact_field_mut().pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.contact_field_mut().push(c);
            }
            _ => {}
        }
    }

    fn contact_field_mut(&mut self) -> &mut String {
        match self.contact_field {
            ContactField::Name => &mut self.contact_form.name,
            ContactField::Email => &mut self.contact_form.email,
            ContactField::Subject => &mut self.contact_form.subject,
            ContactField::Message => &mut self.contact_form.message,
        }
    }

    // ── Output actions ──────────────────────────────────────

    fn copy_output(&mut self) {
        let Some(text) = self.panel.output_text().map(str::to_string) else {
            return;
        };
        match arboard::Clipboard::new().and_then(|mut c| c.set_text(text)) {
            Ok(()) => self.show_toast("Output copied to clipboard", false),
            Err(_) => self.show_toast("Clipboard is not available", true),
        }
    }

    fn save_output_image(&mut self) {
        let Some(image) = self.panel.output_image().cloned() else {
            return;
        };
        let bytes = match image.decode() {
            Ok(b) => b,
            Err(_) => {
                self.show_toast("Image payload is not valid base64", true);
                return;
            }
        };
        let name = format!(
            "toolhub-{}.{}",
            chrono::Local::now().format("%Y%m%d-%H%M%S"),
            image.extension()
        );
        match std::fs::write(&name, bytes) {
            Ok(()) => self.show_toast(&format!("Saved {}", name), false),
            Err(_) => self.show_toast("Could not write image file", true),
        }
    }

    fn show_toast(&mut self, text: &str, error: bool) {
        self.toast = Some(Toast {
            text: text.to_string(),
            error,
            ticks: TOAST_TICKS,
        });
    }

    // ── Drawing ─────────────────────────────────────────────

    fn draw(&mut self, f: &mut Frame) {
        let area = f.area();
        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(area);

        self.draw_nav(f, rows[0]);
        match self.view {
            View::Home => self.draw_home(f, rows[1]),
            View::Tools => self.draw_tools(f, rows[1]),
            View::Chat => self.draw_chat(f, rows[1]),
            View::Blog => self.draw_blog(f, rows[1]),
            View::Contact => self.draw_contact(f, rows[1]),
        }
        self.draw_footer(f, rows[2]);

        if self.view == View::Tools && self.auth.visible {
            self.draw_auth_modal(f, area);
        }
        if let Some(toast) = &self.toast {
            draw_toast(f, area, toast, self.theme);
        }
    }

    fn draw_nav(&self, f: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            " toolhub ",
            Style::default()
                .fg(self.theme.heading())
                .add_modifier(Modifier::BOLD),
        )];
        for (i, view) in View::ALL.iter().enumerate() {
            let label = format!(" F{} {} ", i + 1, view.title());
            if *view == self.view {
                spans.push(Span::styled(
                    label,
                    Style::default()
                        .fg(self.theme.accent())
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                ));
            } else {
                spans.push(Span::styled(label, Style::default().fg(self.theme.dim())));
            }
        }
        let who = match self.gate.state() {
            GateState::Authenticated(user) => user.email.clone(),
            GateState::Loading => "…".to_string(),
            GateState::Unauthenticated => "guest".to_string(),
        };
        spans.push(Span::styled(
            format!("  [{}]", who),
            Style::default().fg(self.theme.dim()),
        ));
        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_footer(&self, f: &mut Frame, area: Rect) {
        let hint = match self.view {
            View::Home => "F1-F5 switch view  Ctrl+T theme  Ctrl+C quit",
            View::Tools => match self.gate.state() {
                GateState::Authenticated(_) => {
                    "Tab focus  Enter select/submit  Ctrl+Y copy  Ctrl+L clear  Ctrl+S save image  Ctrl+↑/↓ resize  F8 sign out"
                }
                _ => "Enter sign in  F1-F5 switch view",
            },
            View::Chat => "Enter send  Alt+Enter newline  PgUp/PgDn scroll",
            View::Blog => "↑/↓ select  Enter expand  r reload",
            View::Contact => "Tab next field  Enter send  Alt+Enter newline in message",
        };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!(" {}", hint),
                Style::default().fg(self.theme.dim()),
            ))),
            area,
        );
    }

    fn draw_home(&self, f: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "  AI Tools Hub",
                Style::default()
                    .fg(self.theme.heading())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "  Harness the power of AI with a suite of text and image tools,",
                Style::default().fg(self.theme.text()),
            )),
            Line::from(Span::styled(
                "  right from your terminal.",
                Style::default().fg(self.theme.text()),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "  F2  open the tools workbench (sign-in required)",
                Style::default().fg(self.theme.accent()),
            )),
            Line::from(Span::styled(
                "  F3  chat with the assistant",
                Style::default().fg(self.theme.accent()),
            )),
            Line::from(Span::styled(
                "  F4  read the blog",
                Style::default().fg(self.theme.accent()),
            )),
            Line::from(Span::styled(
                "  F5  get in touch",
                Style::default().fg(self.theme.accent()),
            )),
        ];
        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.dim())),
        );
        f.render_widget(widget, area);
    }

    fn draw_tools(&mut self, f: &mut Frame, area: Rect) {
        match self.gate.state().clone() {
            GateState::Loading => {
                let widget = Paragraph::new("Checking your session…")
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL));
                f.render_widget(widget, area);
            }
            GateState::Unauthenticated => {
                let lines = vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        "Authentication Required",
                        Style::default()
                            .fg(self.theme.heading())
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                    Line::from(Span::styled(
                        "Please sign in to access the AI tools.",
                        Style::default().fg(self.theme.text()),
                    )),
                    Line::from(""),
                    Line::from(Span::styled(
                        "Press Enter to get started",
                        Style::default().fg(self.theme.accent()),
                    )),
                ];
                let widget = Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL));
                f.render_widget(widget, area);
            }
            GateState::Authenticated(_) => self.draw_panel(f, area),
        }
    }

    fn draw_panel(&mut self, f: &mut Frame, area: Rect) {
        let cols =
            Layout::horizontal([Constraint::Length(30), Constraint::Min(30)]).split(area);
        self.draw_tool_list(f, cols[0]);

        let rows = Layout::vertical([
            Constraint::Length(self.input_rows),
            Constraint::Min(3),
        ])
        .split(cols[1]);
        self.draw_tool_input(f, rows[0]);
        self.draw_tool_output(f, rows[1]);
    }

    fn draw_tool_list(&self, f: &mut Frame, area: Rect) {
        let selected_id = self.panel.selected_id();
        let mut lines = Vec::new();
        for (i, tool) in registry::all().iter().enumerate() {
            let is_cursor = i == self.tool_cursor && self.tools_focus == ToolsFocus::List;
            let is_selected = Some(tool.id) == selected_id;
            let marker = if is_selected { "● " } else { "  " };
            let mut style = Style::default().fg(if is_selected {
                self.theme.accent()
            } else {
                self.theme.text()
            });
            if is_cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            lines.push(Line::from(Span::styled(
                format!("{}{}", marker, tool.name),
                style,
            )));
            lines.push(Line::from(Span::styled(
                format!("    {}", tool.description),
                Style::default().fg(self.theme.dim()),
            )));
        }
        let border = if self.tools_focus == ToolsFocus::List {
            self.theme.accent()
        } else {
            self.theme.dim()
        };
        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Tools ")
                .border_style(Style::default().fg(border)),
        );
        f.render_widget(widget, area);
    }

    fn draw_tool_input(&self, f: &mut Frame, area: Rect) {
        let placeholder = self
            .panel
            .selected_tool()
            .map(|t| t.placeholder)
            .unwrap_or("Select a tool from the list first");
        let border = if self.tools_focus == ToolsFocus::Input {
            self.theme.accent()
        } else {
            self.theme.dim()
        };
        let body: Paragraph = if self.panel.input.is_empty() {
            Paragraph::new(Span::styled(
                placeholder,
                Style::default().fg(self.theme.dim()),
            ))
        } else {
            Paragraph::new(self.panel.input.as_str())
                .style(Style::default().fg(self.theme.text()))
        };
        let widget = body.wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Input ")
                .border_style(Style::default().fg(border)),
        );
        f.render_widget(widget, area);
    }

    fn draw_tool_output(&mut self, f: &mut Frame, area: Rect) {
        let title = if self.panel.in_flight() {
            " Output (processing…) "
        } else {
            " Output "
        };

        let lines: Vec<Line> = if let Some(image) = self.panel.output_image() {
            let uri = image.uri();
            let shown: String = uri.chars().take(80).collect();
            vec![
                Line::from(Span::styled(
                    "Generated image",
                    Style::default()
                        .fg(self.theme.heading())
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    format!("type: {}", image.mime_type),
                    Style::default().fg(self.theme.text()),
                )),
                Line::from(Span::styled(
                    format!("ref:  {}…", shown),
                    Style::default().fg(self.theme.dim()),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Press Ctrl+S to save it next to you.",
                    Style::default().fg(self.theme.accent()),
                )),
            ]
        } else if let Some(text) = self.panel.output_text() {
            markdown::render(text, self.theme)
        } else {
            vec![Line::from(Span::styled(
                "Output appears here.",
                Style::default().fg(self.theme.dim()),
            ))]
        };

        let max_scroll = (lines.len() as u16).saturating_sub(area.height.saturating_sub(2));
        self.output_scroll = self.output_scroll.min(max_scroll);

        let widget = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.output_scroll, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(Style::default().fg(self.theme.dim())),
            );
        f.render_widget(widget, area);
    }

    fn draw_auth_modal(&self, f: &mut Frame, area: Rect) {
        let width = 50u16.min(area.width.saturating_sub(4));
        let height = 10u16.min(area.height.saturating_sub(2));
        let popup = Rect {
            x: (area.width.saturating_sub(width)) / 2,
            y: (area.height.saturating_sub(height)) / 2,
            width,
            height,
        };
        f.render_widget(Clear, popup);

        let title = match self.auth.mode {
            AuthMode::SignIn => " Sign In ",
            AuthMode::SignUp => " Sign Up ",
        };
        let field_line = |label: &str, value: &str, active: bool, mask: bool| {
            let shown = if mask {
                "•".repeat(value.chars().count())
            } else {
                value.to_string()
            };
            Line::from(vec![
                Span::styled(
                    format!(" {:<10}", label),
                    Style::default().fg(self.theme.dim()),
                ),
                Span::styled(
                    shown,
                    if active {
                        Style::default()
                            .fg(self.theme.accent())
                            .add_modifier(Modifier::UNDERLINED)
                    } else {
                        Style::default().fg(self.theme.text())
                    },
                ),
            ])
        };

        let mut lines = vec![
            Line::from(""),
            field_line(
                "Email",
                &self.auth.email,
                self.auth.field == AuthField::Email,
                false,
            ),
            field_line(
                "Password",
                &self.auth.password,
                self.auth.field == AuthField::Password,
                true,
            ),
            Line::from(""),
        ];
        if self.auth.busy {
            lines.push(Line::from(Span::styled(
                " Working…",
                Style::default().fg(self.theme.accent()),
            )));
        } else if let Some(error) = &self.auth.error {
            lines.push(Line::from(Span::styled(
                format!(" {}", error),
                Style::default().fg(self.theme.error()),
            )));
        }
        lines.push(Line::from(Span::styled(
            " Enter submit  Tab field  F6 sign-in/sign-up  Ctrl+G Google  Esc close",
            Style::default().fg(self.theme.dim()),
        )));

        let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(self.theme.accent())),
        );
        f.render_widget(widget, popup);
    }

    fn draw_chat(&mut self, f: &mut Frame, area: Rect) {
        let rows =
            Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).split(area);

        let mut lines: Vec<Line> = Vec::new();
        for turn in self.chat.turns() {
            match turn.speaker {
                Speaker::User => {
                    lines.push(Line::from(vec![
                        Span::styled(
                            "You: ",
                            Style::default()
                                .fg(self.theme.success())
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(turn.text.clone(), Style::default().fg(self.theme.text())),
                    ]));
                }
                Speaker::Assistant => {
                    lines.push(Line::from(Span::styled(
                        "Assistant:",
                        Style::default()
                            .fg(self.theme.accent())
                            .add_modifier(Modifier::BOLD),
                    )));
                    lines.extend(markdown::render(&turn.text, self.theme));
                }
            }
            lines.push(Line::from(""));
        }
        if self.chat.in_flight() {
            lines.push(Line::from(Span::styled(
                "Thinking…",
                Style::default().fg(self.theme.dim()),
            )));
        }

        let max_scroll = (lines.len() as u16).saturating_sub(rows[0].height.saturating_sub(2));
        self.chat_scroll = self.chat_scroll.min(max_scroll);

        let transcript = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.chat_scroll, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" AI Assistant ")
                    .border_style(Style::default().fg(self.theme.dim())),
            );
        f.render_widget(transcript, rows[0]);

        let input: Paragraph = if self.chat.input.is_empty() {
            Paragraph::new(Span::styled(
                "Ask me anything...",
                Style::default().fg(self.theme.dim()),
            ))
        } else {
            Paragraph::new(self.chat.input.as_str())
                .style(Style::default().fg(self.theme.text()))
        };
        f.render_widget(
            input.block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.accent())),
            ),
            rows[1],
        );
    }

    fn draw_blog(&mut self, f: &mut Frame, area: Rect) {
        let lines: Vec<Line> = match &self.blog {
            BlogView::Unconfigured => vec![Line::from(Span::styled(
                "Blog credentials are not configured.",
                Style::default().fg(self.theme.dim()),
            ))],
            BlogView::NotLoaded | BlogView::Loading => vec![Line::from(Span::styled(
                "Loading posts…",
                Style::default().fg(self.theme.dim()),
            ))],
            BlogView::Failed(message) => vec![Line::from(Span::styled(
                format!("Could not load posts: {}", message),
                Style::default().fg(self.theme.error()),
            ))],
            BlogView::Loaded(posts) if posts.is_empty() => vec![Line::from(Span::styled(
                "No posts yet.",
                Style::default().fg(self.theme.dim()),
            ))],
            BlogView::Loaded(posts) => {
                let mut lines = Vec::new();
                for (i, post) in posts.iter().enumerate() {
                    let is_cursor = i == self.blog_cursor;
                    let title_style = if is_cursor {
                        Style::default()
                            .fg(self.theme.heading())
                            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                    } else {
                        Style::default().fg(self.theme.heading())
                    };
                    lines.push(Line::from(Span::styled(post.title.clone(), title_style)));
                    lines.push(Line::from(Span::styled(
                        format!("{} · {}", post.author, post.published),
                        Style::default().fg(self.theme.dim()),
                    )));
                    let body = if is_cursor && self.blog_expanded {
                        &post.content
                    } else {
                        &post.excerpt
                    };
                    lines.push(Line::from(Span::styled(
                        body.clone(),
                        Style::default().fg(self.theme.text()),
                    )));
                    lines.push(Line::from(""));
                }
                lines
            }
        };

        let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Blog ")
                .border_style(Style::default().fg(self.theme.dim())),
        );
        f.render_widget(widget, area);
    }

    fn draw_contact(&self, f: &mut Frame, area: Rect) {
        if self.contact_client.is_none() {
            let widget = Paragraph::new("Contact relay is not configured.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(" Contact "));
            f.render_widget(widget, area);
            return;
        }

        let field_line = |label: &str, value: &str, active: bool| {
            Line::from(vec![
                Span::styled(
                    format!(" {:<9}", label),
                    Style::default().fg(self.theme.dim()),
                ),
                Span::styled(
                    value.to_string(),
                    if active {
                        Style::default()
                            .fg(self.theme.accent())
                            .add_modifier(Modifier::UNDERLINED)
                    } else {
                        Style::default().fg(self.theme.text())
                    },
                ),
            ])
        };

        let mut lines = vec![
            Line::from(""),
            field_line(
                "Name",
                &self.contact_form.name,
                self.contact_field == ContactField::Name,
            ),
            field_line(
                "Email",
                &self.contact_form.email,
                self.contact_field == ContactField::Email,
            ),
            field_line(
                "Subject",
                &self.contact_form.subject,
                self.contact_field == ContactField::Subject,
            ),
            field_line(
                "Message",
                &self.contact_form.message,
                self.contact_field == ContactField::Message,
            ),
            Line::from(""),
        ];
        if self.contact_busy {
            lines.push(Line::from(Span::styled(
                " Sending…",
                Style::default().fg(self.theme.accent()),
            )));
        } else if let Some((status, is_error)) = &self.contact_status {
            let color = if *is_error {
                self.theme.error()
            } else {
                self.theme.success()
            };
            lines.push(Line::from(Span::styled(
                format!(" {}", status),
                Style::default().fg(color),
            )));
        }

        let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Contact Us ")
                .border_style(Style::default().fg(self.theme.dim())),
        );
        f.render_widget(widget, area);
    }
}

fn draw_toast(f: &mut Frame, area: Rect, toast: &Toast, theme: Theme) {
    let width = (toast.text.chars().count() as u16 + 4).min(area.width);
    let rect = Rect {
        x: area.width.saturating_sub(width + 1),
        y: area.height.saturating_sub(3),
        width,
        height: 3,
    };
    f.render_widget(Clear, rect);
    let color = if toast.error {
        theme.error()
    } else {
        theme.success()
    };
    let widget = Paragraph::new(Span::styled(
        toast.text.clone(),
        Style::default().fg(color),
    ))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );
    f.render_widget(widget, rect);
}
