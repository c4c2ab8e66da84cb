//! HTML rendering of the catalog index page.
//!
//! The page template is plain HTML with named slots. Filter button groups
//! and table rows are generated here and substituted into the slots; every
//! value is escaped before insertion. Button `data-*` values and row classes
//! share the [`clean`] form so the page script can match one against the
//! other.

use crate::error::{IndexerError, Result};
use camino::Utf8Path;
use release_catalog::catalog::Artifact;
use release_catalog::export::RenderContext;
use std::time::{SystemTime, UNIX_EPOCH};

/// Built-in page used when no template file is supplied.
pub const DEFAULT_TEMPLATE: &str = include_str!("../data/index.html.template");

const SLOT_VERSIONS: &str = "{{ version_filters }}";
const SLOT_OSES: &str = "{{ os_filters }}";
const SLOT_ARCHES: &str = "{{ arch_filters }}";
const SLOT_BINS: &str = "{{ bin_filters }}";
const SLOT_ROWS: &str = "{{ rows }}";
const SLOT_YEAR: &str = "{{ year }}";

/// Slots the template must contain at least once.
const REQUIRED_SLOTS: [&str; 2] = [SLOT_ROWS, SLOT_YEAR];

/// Produces the human-facing document from a render context.
#[cfg_attr(test, mockall::automock)]
pub trait DocumentRenderer {
    /// Render the document.
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError::Render`] when the template cannot be filled.
    fn render(&self, context: &RenderContext) -> Result<String>;
}

/// Renders the index page by slot substitution.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    template: String,
    download_host: String,
}

impl HtmlRenderer {
    /// Create a renderer from template text.
    #[must_use]
    pub fn new(template: impl Into<String>, download_host: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            download_host: download_host.into(),
        }
    }

    /// Create a renderer with the built-in template.
    #[must_use]
    pub fn with_default_template(download_host: impl Into<String>) -> Self {
        Self::new(DEFAULT_TEMPLATE, download_host)
    }

    /// Create a renderer from a template file.
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError::TemplateRead`] when the file cannot be read.
    pub fn from_file(path: &Utf8Path, download_host: impl Into<String>) -> Result<Self> {
        let template =
            std::fs::read_to_string(path).map_err(|source| IndexerError::TemplateRead {
                path: path.to_owned(),
                source,
            })?;
        Ok(Self::new(template, download_host))
    }
}

impl DocumentRenderer for HtmlRenderer {
    fn render(&self, context: &RenderContext) -> Result<String> {
        if let Some(missing) = REQUIRED_SLOTS
            .iter()
            .find(|slot| !self.template.contains(**slot))
        {
            return Err(IndexerError::Render {
                reason: format!("template has no {missing} slot"),
            });
        }

        let rows = context
            .binaries
            .iter()
            .fold(String::new(), |mut out, artifact| {
                render_row(&mut out, artifact, &self.download_host);
                out
            });

        let versions = filter_group("version", &context.all_versions);
        let oses = filter_group("os", &context.all_oses);
        let arches = filter_group("arch", &context.all_arch);
        let bins = filter_group("bin", &context.all_bins);
        let year = context.year.to_string();

        Ok(fill_slots(
            &self.template,
            &[
                (SLOT_VERSIONS, versions.as_str()),
                (SLOT_OSES, oses.as_str()),
                (SLOT_ARCHES, arches.as_str()),
                (SLOT_BINS, bins.as_str()),
                (SLOT_ROWS, rows.as_str()),
                (SLOT_YEAR, year.as_str()),
            ],
        ))
    }
}

/// Replace every slot occurrence in one pass over `template`.
///
/// Inserted values are never rescanned, so a value that happens to contain
/// slot text is emitted as-is.
fn fill_slots(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    loop {
        let next = slots
            .iter()
            .filter_map(|&(slot, value)| rest.find(slot).map(|at| (at, slot, value)))
            .min_by_key(|&(at, _, _)| at);
        let Some((before, after, value)) = next.and_then(|(_, slot, value)| {
            rest.split_once(slot)
                .map(|(before, after)| (before, after, value))
        }) else {
            break;
        };
        out.push_str(before);
        out.push_str(value);
        rest = after;
    }
    out.push_str(rest);
    out
}

/// Render one button group. The first button starts selected.
fn filter_group(kind: &str, values: &[String]) -> String {
    let mut out = String::new();
    for (index, value) in values.iter().enumerate() {
        let selected = if index == 0 { " is-success" } else { "" };
        out.push_str(&format!(
            "<a class=\"button{selected}\" data-{kind}=\"{class}\">{label}</a>\n",
            class = escape_html(&clean(value)),
            label = escape_html(value),
        ));
    }
    out
}

fn render_row(out: &mut String, artifact: &Artifact, download_host: &str) {
    let classes = [
        artifact.version.as_str(),
        artifact.operating_system.as_str(),
        artifact.architecture.as_str(),
        artifact.base_name(),
    ]
    .map(clean)
    .join(" ");
    let link = escape_html(&artifact.link(download_host));
    out.push_str(&format!(
        concat!(
            r#"<tr class="{classes}">"#,
            "<td>{version}</td><td>{os}</td><td>{arch}</td>",
            r#"<td><a class="copy" href="https://{link}">{link}</a></td></tr>"#,
            "\n",
        ),
        classes = escape_html(&classes),
        version = escape_html(&artifact.version),
        os = escape_html(&artifact.operating_system),
        arch = escape_html(&artifact.architecture),
        link = link,
    ));
}

/// Turn a facet value into a CSS class name.
///
/// Dots become dashes; otherwise a value starting below `a` (a digit or an
/// upper-case letter) gains an `a-` prefix.
///
/// # Examples
///
/// ```
/// use release_catalog_indexer::render::clean;
///
/// assert_eq!(clean("v1.30.0"), "v1-30-0");
/// assert_eq!(clean("386"), "a-386");
/// assert_eq!(clean("linux"), "linux");
/// ```
#[must_use]
pub fn clean(value: &str) -> String {
    if value.contains('.') {
        value.replace('.', "-")
    } else if value.chars().next().is_some_and(|first| first < 'a') {
        format!("a-{value}")
    } else {
        value.to_owned()
    }
}

/// Escape text for use in HTML element content and quoted attributes.
#[must_use]
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Return the current UTC calendar year.
///
/// Falls back to 1970 when the system clock reads before the epoch.
#[must_use]
pub fn current_year() -> u32 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs());
    year_from_epoch(secs)
}

/// Convert a Unix timestamp to its UTC calendar year.
///
/// Howard Hinnant's `civil_from_days`, reduced to the year.
#[expect(
    clippy::integer_division,
    reason = "calendar arithmetic relies on truncating division"
)]
fn year_from_epoch(epoch_secs: u64) -> u32 {
    let z = i64::try_from(epoch_secs / 86_400).unwrap_or(i64::MAX - 719_468) + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097); // day of era [0, 146_096]
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let year = yoe + era * 400 + i64::from(mp >= 10);
    u32::try_from(year).unwrap_or(u32::MAX)
}
