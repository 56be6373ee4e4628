//! Shared UI icons and emojis.
//!
//! Each constant carries a plain-text fallback that `console` uses when the
//! terminal cannot render unicode.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
pub static SIREN: Emoji<'_, '_> = Emoji("🚨🚨🚨 ", "[ERR] ");
pub static PARTY: Emoji<'_, '_> = Emoji("🥳 ", "");
pub static ARROW: Emoji<'_, '_> = Emoji("▶ ", "> ");

// Step indicators
pub static NEWSPAPER: Emoji<'_, '_> = Emoji("📰 ", "");
pub static ALEMBIC: Emoji<'_, '_> = Emoji("⚗️ ", "");
pub static KEY: Emoji<'_, '_> = Emoji("🔑 ", "");
pub static LINK: Emoji<'_, '_> = Emoji("🔗 ", "");
pub static BUILD: Emoji<'_, '_> = Emoji("🏗️ ", "");
pub static CABINET: Emoji<'_, '_> = Emoji("🗄️ ", "");
pub static SEEDLING: Emoji<'_, '_> = Emoji("🌱 ", "");
pub static BROOM: Emoji<'_, '_> = Emoji("🧹 ", "");
pub static MEMO: Emoji<'_, '_> = Emoji("📝 ", "");
