//! Title rendering.
//!
//! A title embeds the live counters and the original title in one of a
//! fixed set of equivalent phrasings. Which phrasing is used is decided
//! by an injectable selector so the output is reproducible under test.

use rand::Rng;
use vtitle_models::VideoStats;

/// Hard limit the platform enforces on titles, in characters.
pub const MAX_TITLE_CHARS: usize = 100;

const ELLIPSIS: &str = "...";

/// Phrasings of the detailed title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleTemplate {
    /// `Demo | 1,000 Views, 50 Likes, 10 Comments`
    TitleFirst,
    /// `This video has 1,000 views, 50 likes and 10 comments | Demo`
    Sentence,
    /// `1,000 Views | 50 Likes | 10 Comments | Demo`
    CountersFirst,
    /// `Demo (1,000 views, 50 likes, 10 comments)`
    Parenthesized,
}

impl TitleTemplate {
    pub const ALL: [TitleTemplate; 4] = [
        TitleTemplate::TitleFirst,
        TitleTemplate::Sentence,
        TitleTemplate::CountersFirst,
        TitleTemplate::Parenthesized,
    ];

    /// Render without any length limit.
    pub fn render(&self, stats: &VideoStats, original_title: &str) -> String {
        let views = format_count(stats.views);
        let likes = format_count(stats.likes);
        let comments = format_count(stats.comments);

        match self {
            TitleTemplate::TitleFirst => {
                format!("{original_title} | {views} Views, {likes} Likes, {comments} Comments")
            }
            TitleTemplate::Sentence => {
                format!(
                    "This video has {views} views, {likes} likes and {comments} comments \
                     | {original_title}"
                )
            }
            TitleTemplate::CountersFirst => {
                format!("{views} Views | {likes} Likes | {comments} Comments | {original_title}")
            }
            TitleTemplate::Parenthesized => {
                format!("{original_title} ({views} views, {likes} likes, {comments} comments)")
            }
        }
    }
}

/// Format a counter with comma thousands separators.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Cut `title` to at most [`MAX_TITLE_CHARS`] characters, marking the cut with an ellipsis.
pub fn truncate_title(title: String) -> String {
    if title.chars().count() <= MAX_TITLE_CHARS {
        return title;
    }
    let mut truncated: String = title.chars().take(MAX_TITLE_CHARS - ELLIPSIS.len()).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

type Selector = Box<dyn Fn(usize) -> usize + Send + Sync>;

/// Renders titles, picking a template through the selector.
///
/// The selector receives the number of templates and returns an index;
/// out-of-range indices wrap around.
pub struct TitleRenderer {
    selector: Selector,
}

impl TitleRenderer {
    /// Uniformly random template choice.
    pub fn random() -> Self {
        Self::with_selector(|count| rand::rng().random_range(0..count))
    }

    pub fn with_selector(selector: impl Fn(usize) -> usize + Send + Sync + 'static) -> Self {
        Self {
            selector: Box::new(selector),
        }
    }

    /// Always use `template`.
    pub fn fixed(template: TitleTemplate) -> Self {
        let index = TitleTemplate::ALL
            .iter()
            .position(|t| *t == template)
            .unwrap_or_default();
        Self::with_selector(move |_| index)
    }

    /// Render a title of at most [`MAX_TITLE_CHARS`] characters.
    pub fn render(&self, stats: &VideoStats, original_title: &str) -> String {
        let index = (self.selector)(TitleTemplate::ALL.len()) % TitleTemplate::ALL.len();
        truncate_title(TitleTemplate::ALL[index].render(stats, original_title))
    }
}

impl Default for TitleRenderer {
    fn default() -> Self {
        Self::random()
    }
}

impl std::fmt::Debug for TitleRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TitleRenderer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_stats() -> VideoStats {
        VideoStats::new(1000, 50, 10, "Demo", None)
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(12345), "12,345");
        assert_eq!(format_count(1234567), "1,234,567");
        assert_eq!(format_count(100000), "100,000");
    }

    #[test]
    fn test_exact_output_per_template() {
        let stats = demo_stats();
        let expected = [
            "Demo | 1,000 Views, 50 Likes, 10 Comments",
            "This video has 1,000 views, 50 likes and 10 comments | Demo",
            "1,000 Views | 50 Likes | 10 Comments | Demo",
            "Demo (1,000 views, 50 likes, 10 comments)",
        ];
        for (i, want) in expected.iter().enumerate() {
            let renderer = TitleRenderer::with_selector(move |_| i);
            assert_eq!(renderer.render(&stats, "Demo"), *want);
        }
    }

    #[test]
    fn test_demo_scenario_under_any_template() {
        let stats = demo_stats();
        for template in TitleTemplate::ALL {
            let title = TitleRenderer::fixed(template).render(&stats, "Demo");
            assert!(title.contains("1,000"));
            assert!(title.contains("50"));
            assert!(title.contains("10"));
            assert!(title.contains("Demo"));
            assert!(title.chars().count() <= MAX_TITLE_CHARS);
        }
    }

    #[test]
    fn test_long_title_truncated_to_exactly_limit() {
        let stats = VideoStats::new(123_456_789, 1_234_567, 98_765, "", None);
        let original = "A very long original title that keeps going and going well past the limit";
        for template in TitleTemplate::ALL {
            let title = TitleRenderer::fixed(template).render(&stats, original);
            assert_eq!(title.chars().count(), MAX_TITLE_CHARS);
            assert!(title.ends_with("..."));
        }
    }

    #[test]
    fn test_truncation_counts_characters() {
        let title = "é".repeat(150);
        let truncated = truncate_title(title);
        assert_eq!(truncated.chars().count(), MAX_TITLE_CHARS);
        assert!(truncated.starts_with(&"é".repeat(97)));
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_exact_limit_untouched() {
        let title = "x".repeat(MAX_TITLE_CHARS);
        assert_eq!(truncate_title(title.clone()), title);
    }

    #[test]
    fn test_selector_out_of_range_wraps() {
        let renderer = TitleRenderer::with_selector(|count| count + 1);
        assert_eq!(
            renderer.render(&demo_stats(), "Demo"),
            "This video has 1,000 views, 50 likes and 10 comments | Demo"
        );
    }

    #[test]
    fn test_random_renderer_stays_in_bounds() {
        let renderer = TitleRenderer::random();
        for _ in 0..50 {
            let title = renderer.render(&demo_stats(), "Demo");
            assert!(title.contains("Demo"));
        }
    }
}
