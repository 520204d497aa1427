//! Light/dark theme preference with explicit change notification.
//!
//! # Design
//! `ThemePreference` owns a single `is_dark` flag. Observers register with
//! `subscribe` and are called once immediately, then synchronously after
//! every change. The `dark` marker on the presentation root is one such
//! observer (`bind_dark_marker`), not something the flag knows about.
//!
//! Everything here is single-threaded: shared roots are `Rc<RefCell<_>>`.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use tracing::debug;

/// Class toggled on the presentation root while the dark theme is active.
pub const DARK_CLASS: &str = "dark";

/// Environment override read by `SystemColorScheme`.
pub const COLOR_SCHEME_ENV: &str = "TODO_COLOR_SCHEME";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

impl ColorScheme {
    pub fn is_dark(self) -> bool {
        self == ColorScheme::Dark
    }

    /// Accepts `dark` / `light` in any case, surrounding whitespace ignored.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(ColorScheme::Dark),
            "light" => Some(ColorScheme::Light),
            _ => None,
        }
    }
}

/// Where the initial preference comes from. Queried once per construction.
pub trait ColorSchemeSource {
    fn preferred_scheme(&self) -> ColorScheme;
}

/// A preference supplied by the host.
#[derive(Debug, Clone, Copy)]
pub struct FixedColorScheme(pub ColorScheme);

impl ColorSchemeSource for FixedColorScheme {
    fn preferred_scheme(&self) -> ColorScheme {
        self.0
    }
}

/// Reads the desktop preference from the process environment.
///
/// `TODO_COLOR_SCHEME` wins when it holds `dark` or `light`; otherwise a
/// `GTK_THEME` ending in `:dark` means dark. Anything else is light.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemColorScheme;

impl ColorSchemeSource for SystemColorScheme {
    fn preferred_scheme(&self) -> ColorScheme {
        scheme_from_lookup(|key| std::env::var(key).ok())
    }
}

fn scheme_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ColorScheme {
    if let Some(scheme) = lookup(COLOR_SCHEME_ENV).as_deref().and_then(ColorScheme::parse) {
        return scheme;
    }
    match lookup("GTK_THEME") {
        Some(theme) if theme.to_ascii_lowercase().ends_with(":dark") => ColorScheme::Dark,
        _ => ColorScheme::Light,
    }
}

/// The node whose class list carries the theme marker.
pub trait PresentationRoot {
    fn add_class(&mut self, class: &str);
    fn remove_class(&mut self, class: &str);
    fn has_class(&self, class: &str) -> bool;
}

/// In-memory class list, e.g. for a headless host or tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    classes: BTreeSet<String>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }
}

impl PresentationRoot for ClassList {
    fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Numeric form for hosts that cannot hold Rust values.
    pub fn into_raw(self) -> u64 {
        self.0
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

type Listener = Box<dyn FnMut(bool)>;

/// Reactive dark-mode flag.
pub struct ThemePreference {
    is_dark: bool,
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl std::fmt::Debug for ThemePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemePreference")
            .field("is_dark", &self.is_dark)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ThemePreference {
    pub fn new(source: &dyn ColorSchemeSource) -> Self {
        Self::with_scheme(source.preferred_scheme())
    }

    pub fn with_scheme(scheme: ColorScheme) -> Self {
        Self {
            is_dark: scheme.is_dark(),
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    /// Preference from the process environment, see `SystemColorScheme`.
    pub fn from_system() -> Self {
        Self::new(&SystemColorScheme)
    }

    pub fn is_dark(&self) -> bool {
        self.is_dark
    }

    pub fn scheme(&self) -> ColorScheme {
        if self.is_dark {
            ColorScheme::Dark
        } else {
            ColorScheme::Light
        }
    }

    pub fn toggle_theme(&mut self) {
        self.set_dark(!self.is_dark);
    }

    /// Observers only hear about actual changes.
    pub fn set_dark(&mut self, is_dark: bool) {
        if self.is_dark == is_dark {
            return;
        }
        self.is_dark = is_dark;
        debug!(is_dark, "theme changed");
        for (_, listener) in &mut self.listeners {
            listener(is_dark);
        }
    }

    /// Register `listener` and call it right away with the current value.
    pub fn subscribe(&mut self, mut listener: impl FnMut(bool) + 'static) -> SubscriptionId {
        listener(self.is_dark);
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Keep `DARK_CLASS` on `root` in step with the flag, starting now.
    pub fn bind_dark_marker<R>(&mut self, root: Rc<RefCell<R>>) -> SubscriptionId
    where
        R: PresentationRoot + 'static,
    {
        self.subscribe(move |is_dark| {
            let mut root = root.borrow_mut();
            if is_dark {
                root.add_class(DARK_CLASS);
            } else {
                root.remove_class(DARK_CLASS);
            }
        })
    }
}
