//! Chrome DevTools Protocol によるブラウザ操作の実装

mod chromium;
mod script;

pub use chromium::{ChromiumBrowser, ChromiumContext, ChromiumLauncher, ChromiumPage};
