//! Hooks observe every written entry.
//!
//! A hook runs on the logging thread right after the sinks, so anything slow
//! (pushing to a search index, paging someone) belongs on another thread;
//! [`out_of_band`] does that wrapping.

use std::sync::Arc;
use teelog_types::Result;

use crate::entry::Entry;

/// Callback run after each written entry.
pub type Hook = Arc<dyn Fn(&Entry) -> Result<()> + Send + Sync>;

/// Hook from a closure.
pub fn from_fn<F>(f: F) -> Hook
where
    F: Fn(&Entry) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Hook that hands a copy of each entry to `f` on a freshly spawned thread.
///
/// The logging call never waits for `f`.
pub fn out_of_band<F>(f: F) -> Hook
where
    F: Fn(Entry) + Send + Sync + 'static,
{
    let f = Arc::new(f);
    Arc::new(move |entry: &Entry| -> Result<()> {
        let f = Arc::clone(&f);
        let entry = entry.clone();
        std::thread::Builder::new()
            .name("teelog-hook".to_string())
            .spawn(move || f(entry))?;
        Ok(())
    })
}

/// Example hook printing each entry to standard output.
pub fn stdout_hooker() -> Hook {
    out_of_band(|entry| println!("Stdout Hooker: {:#?}", entry))
}
