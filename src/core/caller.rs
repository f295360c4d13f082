//! Call-site location and per-thread identifiers

use std::cell::Cell;
use std::panic::Location;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

// Thread-local cache so the id is assigned once per thread
thread_local! {
    static THREAD_ID_CACHE: Cell<u64> = const { Cell::new(0) };
}

/// Small numeric id of the current thread, stable for the thread's lifetime.
///
/// Ids are handed out in the order threads first ask for one, starting at 1.
/// This is what the `goid` field carries.
pub fn thread_id() -> u64 {
    THREAD_ID_CACHE.with(|cache| {
        let id = cache.get();
        if id != 0 {
            return id;
        }
        let id = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
        cache.set(id);
        id
    })
}

/// How the `caller` field is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallerMode {
    #[default]
    Off,
    /// Last two path components: `src/main.rs:42`
    Short,
    /// The path as recorded by the compiler
    Full,
}

impl CallerMode {
    /// Map the numeric config convention: 0 off, positive short, negative full.
    pub fn from_depth(depth: i32) -> Self {
        match depth {
            0 => CallerMode::Off,
            d if d > 0 => CallerMode::Short,
            _ => CallerMode::Full,
        }
    }
}

/// Trim a file path to its last two components.
pub fn short_path(file: &str) -> &str {
    let mut seps = file.rmatch_indices(['/', '\\']).map(|(i, _)| i);
    match (seps.next(), seps.next()) {
        (Some(_), Some(second)) => &file[second + 1..],
        _ => file,
    }
}

/// `file:line` text for a location.
pub fn location_text<'a>(location: &'a Location<'a>, mode: CallerMode) -> (&'a str, u32) {
    let file = match mode {
        CallerMode::Full => location.file(),
        _ => short_path(location.file()),
    };
    (file, location.line())
}
