//! HTML pages rendered with `maud`.
//!
//! Three pages exist:
//!
//! - [`display_page`] – what the kiosk browser shows: a grid of iframes that
//!   rotates through the configured URLs, reloads itself when `/last-updated`
//!   moves, and shows a banner while `/network-status` reports offline.
//! - [`manage_page`] – the operator's editing page.
//! - [`locked_page`] – shown instead of `manage_page` when the dashboard is
//!   disabled.

use kiosk_core::KioskDocument;
use maud::{html, Markup, PreEscaped, DOCTYPE};

/// Layout names offered in the management page's drop-down.
pub const LAYOUT_CHOICES: &[&str] = &["auto", "1x1", "2x1", "1x2", "2x2", "3x2", "3x3"];

/// Seconds each set of URLs stays on screen before rotating.
const ROTATE_SECONDS: u32 = 30;

/// Largest number of columns or rows an explicit layout may ask for.
pub const MAX_GRID_SIDE: usize = 8;

const STYLE: &str = r#"
html, body { margin: 0; height: 100%; font-family: system-ui, sans-serif; }
.grid { display: grid; width: 100vw; height: 100vh; gap: 2px; background: #111; }
.grid iframe { width: 100%; height: 100%; border: 0; background: #fff; }
.empty { display: flex; align-items: center; justify-content: center; height: 100vh; color: #888; }
#offline { display: none; position: fixed; bottom: 1rem; right: 1rem; padding: .5rem 1rem;
           background: #b00020; color: #fff; border-radius: 4px; }
.manage { max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
.manage li { display: flex; justify-content: space-between; margin: .25rem 0; }
.manage section { margin-bottom: 2rem; }
.danger { background: #b00020; color: #fff; border: 0; padding: .4rem .8rem; }
"#;

const DISPLAY_SCRIPT: &str = r#"
(function () {
  const grid = document.getElementById('grid');
  if (!grid) { return; }
  const urls = JSON.parse(grid.dataset.urls);
  const frames = Array.from(grid.querySelectorAll('iframe'));
  const rotate = Number(grid.dataset.rotate) * 1000;
  let offset = 0;
  function show() {
    frames.forEach(function (frame, i) {
      const url = urls[(offset + i) % urls.length];
      if (frame.getAttribute('src') !== url) { frame.setAttribute('src', url); }
    });
  }
  show();
  if (urls.length > frames.length) {
    setInterval(function () { offset = (offset + frames.length) % urls.length; show(); }, rotate);
  }
  let seen = null;
  setInterval(function () {
    fetch('/last-updated').then(function (r) { return r.text(); }).then(function (t) {
      if (seen !== null && t !== seen) { location.reload(); }
      seen = t;
    }).catch(function () {});
  }, 5000);
  const banner = document.getElementById('offline');
  function status() {
    fetch('/network-status').then(function (r) { return r.json(); }).then(function (s) {
      banner.style.display = s.online ? 'none' : 'block';
    }).catch(function () {});
  }
  status();
  setInterval(status, 30000);
})();
"#;

const MANAGE_SCRIPT: &str = r#"
document.querySelectorAll('[data-system]').forEach(function (button) {
  button.addEventListener('click', function () {
    if (!confirm(button.dataset.confirm)) { return; }
    fetch(button.dataset.system, { method: 'POST' }).then(function (r) {
      alert(r.ok ? 'Done.' : 'Failed: HTTP ' + r.status);
    });
  });
});
"#;

/// Columns and rows for `layout` showing `count` URLs.
///
/// `"CxR"` layouts are taken literally, with each side clamped to
/// [`MAX_GRID_SIDE`].  `"auto"` and anything unparsable pick the smallest
/// near-square grid that fits every URL, also clamped.
pub fn grid_for(layout: &str, count: usize) -> (usize, usize) {
    if let Some((cols, rows)) = layout.split_once('x') {
        if let (Ok(cols), Ok(rows)) = (cols.trim().parse::<usize>(), rows.trim().parse::<usize>()) {
            if cols > 0 && rows > 0 {
                return (cols.min(MAX_GRID_SIDE), rows.min(MAX_GRID_SIDE));
            }
        }
    }

    // Extra URLs beyond a full grid are shown by rotation.
    let count = count.clamp(1, MAX_GRID_SIDE * MAX_GRID_SIDE);
    let mut cols = 1;
    while cols * cols < count {
        cols += 1;
    }
    let rows = count.div_ceil(cols);
    (cols, rows)
}

fn page(title: &str, head_extra: Markup, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(STYLE)) }
                (head_extra)
            }
            body { (body) }
        }
    }
}

/// The kiosk display page.
pub fn display_page(doc: &KioskDocument) -> Markup {
    if doc.urls.is_empty() {
        return page(
            "Kiosk",
            html! {},
            html! {
                div.empty { "No URLs configured. Open /manage to add some." }
                div #offline { "Offline" }
            },
        );
    }

    let (cols, rows) = grid_for(&doc.layout, doc.urls.len());
    let cells = cols.saturating_mul(rows).min(doc.urls.len());
    let urls_json = serde_json::to_string(&doc.urls).unwrap_or_else(|_| "[]".to_string());

    page(
        "Kiosk",
        html! {},
        html! {
            div.grid #grid
                data-urls=(urls_json)
                data-rotate=(ROTATE_SECONDS)
                data-layout=(doc.layout)
                style={ "grid-template-columns: repeat(" (cols) ", 1fr); grid-template-rows: repeat(" (rows) ", 1fr);" }
            {
                @for _ in 0..cells {
                    iframe {}
                }
            }
            div #offline { "Offline" }
            script { (PreEscaped(DISPLAY_SCRIPT)) }
        },
    )
}

/// The management page.
pub fn manage_page(doc: &KioskDocument) -> Markup {
    let custom_layout = !LAYOUT_CHOICES.contains(&doc.layout.as_str());

    page(
        "Kiosk - Manage",
        html! {},
        html! {
            main.manage {
                h1 { "Kiosk dashboard" }

                section {
                    h2 { "Display URLs" }
                    @if doc.urls.is_empty() {
                        p { em { "No URLs yet." } }
                    } @else {
                        ol #urls {
                            @for url in &doc.urls {
                                li {
                                    a href=(url) target="_blank" rel="noopener" { (url) }
                                    form method="post" action="/manage" {
                                        input type="hidden" name="remove" value=(url);
                                        button type="submit" { "Remove" }
                                    }
                                }
                            }
                        }
                    }
                    form method="post" action="/manage" {
                        input type="url" name="url" placeholder="https://..." required;
                        button type="submit" name="add" value="1" { "Add" }
                    }
                }

                section {
                    h2 { "Layout" }
                    form method="post" action="/manage" {
                        select name="layout" {
                            @if custom_layout {
                                option value=(doc.layout) selected { (doc.layout) }
                            }
                            @for choice in LAYOUT_CHOICES {
                                option value=(choice) selected[*choice == doc.layout] { (choice) }
                            }
                        }
                        button type="submit" { "Apply" }
                    }
                }

                section {
                    h2 { "Generator URL" }
                    form method="post" action="/manage" {
                        input type="url" name="generator_url" value=(doc.generator_url)
                            placeholder="leave empty to clear";
                        button type="submit" name="set_generator" value="1" { "Save" }
                    }
                    @if let Some(generator) = doc.generator() {
                        p { "Current: " a href=(generator) target="_blank" rel="noopener" { (generator) } }
                    }
                }

                section {
                    h2 { "System" }
                    p {
                        button.danger type="button"
                            data-system="/system/stop-session"
                            data-confirm="Stop the kiosk session?" { "Stop session" }
                        " "
                        button.danger type="button"
                            data-system="/system/reboot"
                            data-confirm="Reboot the kiosk?" { "Reboot" }
                    }
                    form method="post" action="/manage" {
                        button.danger type="submit" name="lock" value="1" { "Lock dashboard" }
                    }
                }
            }
            script { (PreEscaped(MANAGE_SCRIPT)) }
        },
    )
}

/// Shown instead of the management page while `dashboard_enabled` is false.
pub fn locked_page() -> Markup {
    page(
        "Kiosk - Locked",
        html! {},
        html! {
            main.manage {
                h1 { "Dashboard locked" }
                p {
                    "The management dashboard is disabled. Set "
                    code { "\"dashboard_enabled\": true" }
                    " in the kiosk configuration file to unlock it."
                }
            }
        },
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
