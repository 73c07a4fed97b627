//! Process-wide active locale.
//!
//! Month and weekday names used while parsing dates come from the active
//! locale, which is global to the process. All changes go through
//! [`LocaleContext`], which holds [`LOCALE_LOCK`] for its whole lifetime and
//! puts the previous locale back when dropped.

use std::env::var;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use chrono::Locale;
use tracing::trace;

use crate::error::{Result, VaxError};

static LOCALE_LOCK: Mutex<()> = Mutex::new(());
static ACTIVE_LOCALE: RwLock<Locale> = RwLock::new(Locale::POSIX);

/// Two-letter language code -> locale name.
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("bg", "bg_BG"),
    ("ca", "ca_ES"),
    ("cs", "cs_CZ"),
    ("da", "da_DK"),
    ("de", "de_DE"),
    ("el", "el_GR"),
    ("en", "en_US"),
    ("es", "es_ES"),
    ("et", "et_EE"),
    ("fi", "fi_FI"),
    ("fr", "fr_FR"),
    ("hr", "hr_HR"),
    ("hu", "hu_HU"),
    ("id", "id_ID"),
    ("is", "is_IS"),
    ("it", "it_IT"),
    ("lt", "lt_LT"),
    ("lv", "lv_LV"),
    ("mk", "mk_MK"),
    ("ms", "ms_MY"),
    ("nl", "nl_NL"),
    ("no", "nb_NO"),
    ("pl", "pl_PL"),
    ("pt", "pt_PT"),
    ("ro", "ro_RO"),
    ("ru", "ru_RU"),
    ("sk", "sk_SK"),
    ("sl", "sl_SI"),
    ("sq", "sq_AL"),
    ("sr", "sr_RS"),
    ("sv", "sv_SE"),
    ("tr", "tr_TR"),
    ("uk", "uk_UA"),
    ("vi", "vi_VN"),
];

pub fn language_alias(lang: &str) -> Option<&'static str> {
    LANGUAGE_ALIASES
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(lang))
        .map(|(_, name)| *name)
}

/// Picks the locale name to activate. A recognised `lang` wins over
/// `locale_name`; an unrecognised one is ignored.
pub fn locale_name_for(lang: Option<&str>, locale_name: &str) -> String {
    let name = lang.and_then(language_alias).unwrap_or(locale_name);
    if cfg!(windows) {
        name.replace('_', "-")
    } else {
        name.to_string()
    }
}

/// Resolves a locale name such as `fr_FR`, `fr-FR`, `fr_FR.UTF-8`,
/// `sr_RS@latin`, `C` or `POSIX`. An empty name means the environment
/// default (`LC_ALL`, then `LC_TIME`, then `LANG`).
pub fn resolve_locale(name: &str) -> Result<Locale> {
    let name = if name.is_empty() {
        environment_locale_name()
    } else {
        name.to_string()
    };

    let (base, modifier) = match name.split_once('@') {
        Some((base, modifier)) => (base, Some(modifier)),
        None => (name.as_str(), None),
    };
    let base = base.split('.').next().unwrap_or(base).replace('-', "_");
    if base == "C" || base == "POSIX" {
        return Ok(Locale::POSIX);
    }

    let lookup = match modifier {
        Some(m) => format!("{base}@{m}"),
        None => base,
    };
    Locale::try_from(lookup.as_str()).map_err(|_| VaxError::LocaleUnavailable(name.clone()))
}

fn environment_locale_name() -> String {
    var("LC_ALL")
        .or_else(|_| var("LC_TIME"))
        .or_else(|_| var("LANG"))
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "C".to_string())
}

/// The locale currently active for this process.
pub fn current_locale() -> Locale {
    *ACTIVE_LOCALE.read().unwrap_or_else(PoisonError::into_inner)
}

fn set_active(locale: Locale) {
    *ACTIVE_LOCALE.write().unwrap_or_else(PoisonError::into_inner) = locale;
}

/// Scoped switch of the process locale.
///
/// While alive it owns the global locale lock; on drop the saved locale is
/// reinstated before the lock is released.
pub struct LocaleContext {
    saved: Locale,
    active: Locale,
    _lock: MutexGuard<'static, ()>,
}

impl LocaleContext {
    /// Blocks until no other context is alive, then activates `name`.
    /// If `name` cannot be resolved nothing is changed.
    pub fn enter(name: &str) -> Result<Self> {
        let lock = LOCALE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let saved = current_locale();
        let active = resolve_locale(name)?;
        set_active(active);
        trace!(?saved, ?active, "locale.enter");
        Ok(Self {
            saved,
            active,
            _lock: lock,
        })
    }

    pub fn locale(&self) -> Locale {
        self.active
    }
}

impl Drop for LocaleContext {
    fn drop(&mut self) {
        set_active(self.saved);
        trace!(restored = ?self.saved, "locale.exit");
    }
}

/// Serialises tests that observe the global locale from outside a context.
#[cfg(test)]
pub(crate) fn test_serial() -> MutexGuard<'static, ()> {
    static SERIAL: Mutex<()> = Mutex::new(());
    SERIAL.lock().unwrap_or_else(PoisonError::into_inner)
}
