//! Console output formatter for panel discussions

use colored::{ColoredString, Colorize};
use panel_application::DiscussionView;
use panel_domain::{
    ArticleId, CachedPanelSummary, ConsensusSummary, MarketData, MarketEvent, PanelOpinion,
    Sentiment,
};

/// Formats discussions for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete discussion
    ///
    /// Equal to [`format_opening`](Self::format_opening), every opinion, then
    /// [`format_closing`](Self::format_closing), so a streamed reveal prints
    /// the same text as a cache hit.
    pub fn format(view: &DiscussionView) -> String {
        let mut output = Self::format_opening(view.article_id.as_ref());

        for (index, opinion) in view.opinions.iter().enumerate() {
            output.push_str(&Self::format_opinion(index, opinion));
        }

        output.push_str(&Self::format_closing(view));
        output
    }

    /// Banner and article line printed before the first opinion
    pub fn format_opening(article_id: Option<&ArticleId>) -> String {
        let mut output = Self::header("Analyst Panel");
        output.push('\n');
        if let Some(id) = article_id {
            output.push_str(&format!("{} {}\n", "Article:".cyan().bold(), id));
        }
        output
    }

    /// Consensus sections and footer printed after the last opinion
    pub fn format_closing(view: &DiscussionView) -> String {
        let mut output = Self::format_consensus(view);
        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(view: &DiscussionView) -> String {
        serde_json::to_string_pretty(view).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format one opinion as it is revealed
    pub fn format_opinion(index: usize, opinion: &PanelOpinion) -> String {
        let mut output = String::new();

        let title = format!(
            "── {} {} · {} ──",
            opinion.icon,
            opinion.model,
            if opinion.role.is_empty() {
                opinion.opinion_type.as_str()
            } else {
                opinion.role.as_str()
            }
        );
        output.push_str(&format!(
            "\n{} {}\n",
            format!("#{}", index + 1).dimmed(),
            Self::paint(&title, &opinion.color).bold()
        ));

        let mut tags = Vec::new();
        if let Some(sentiment) = opinion.sentiment {
            tags.push(Self::sentiment_label(sentiment).to_string());
        }
        if let Some(confidence) = opinion.confidence {
            tags.push(format!("confidence {:.0}%", confidence * 100.0));
        }
        if !tags.is_empty() {
            output.push_str(&format!("{}\n", tags.join(" | ").dimmed()));
        }

        output.push_str(&opinion.message);
        output.push('\n');

        Self::push_points(&mut output, "Agrees:", opinion.agrees_with_points.as_deref(), "+");
        Self::push_points(
            &mut output,
            "Disagrees:",
            opinion.disagrees_with_points.as_deref(),
            "-",
        );
        Self::push_points(&mut output, "New insights:", opinion.new_insights.as_deref(), "*");
        output
    }

    /// Format the consensus, market data and calendar sections
    pub fn format_consensus(view: &DiscussionView) -> String {
        let mut output = String::new();

        output.push_str(&Self::section_header("Consensus"));
        match &view.consensus {
            Some(consensus) => output.push_str(&Self::format_summary(consensus)),
            None => output.push_str(&format!("{}\n", "No consensus was reached.".dimmed())),
        }
        output.push_str(&format!(
            "{} {:.0}%\n",
            "Panel agreement:".cyan().bold(),
            view.consensus_level()
        ));

        if let Some(market) = &view.market_data {
            output.push_str(&Self::format_market(market));
        }
        if !view.economic_calendar.is_empty() {
            output.push_str(&Self::format_calendar(&view.economic_calendar));
        }
        output
    }

    /// Format the `cache list` table
    pub fn format_cache_list(summaries: &[CachedPanelSummary]) -> String {
        if summaries.is_empty() {
            return format!("{}\n", "No cached discussions.".dimmed());
        }

        let mut output = format!(
            "{:<24} {:<6} {:>8} {:<12} {}\n",
            "ARTICLE".bold(),
            "LANG".bold(),
            "OPINIONS".bold(),
            "VERDICT".bold(),
            "CACHED AT".bold()
        );
        for s in summaries {
            output.push_str(&format!(
                "{:<24} {:<6} {:>8} {:<12} {}\n",
                s.article_id.as_str(),
                s.language.as_str(),
                s.opinion_count,
                s.recommendation.as_deref().unwrap_or("-"),
                s.timestamp.format("%Y-%m-%d %H:%M UTC")
            ));
        }
        output
    }

    fn format_summary(consensus: &ConsensusSummary) -> String {
        let mut output = format!(
            "{} {}  {} {}%\n",
            "Recommendation:".bold(),
            Self::recommendation_label(&consensus.recommendation),
            "Confidence:".bold(),
            consensus.confidence
        );
        if !consensus.timeframe.is_empty() {
            output.push_str(&format!("{} {}\n", "Timeframe:".bold(), consensus.timeframe));
        }
        if !consensus.risk_level.is_empty() {
            output.push_str(&format!("{} {}\n", "Risk:".bold(), consensus.risk_level));
        }
        Self::push_points(&mut output, "Key points:", Some(consensus.key_points.as_slice()), "*");
        output
    }

    fn format_market(market: &MarketData) -> String {
        let mut output = Self::section_header("Market Data");
        for (ticker, snapshot) in market {
            let change = match snapshot.change_percent {
                Some(c) if c >= 0.0 => format!("+{:.2}%", c).green(),
                Some(c) => format!("{:.2}%", c).red(),
                None => "".normal(),
            };
            output.push_str(&format!("  {:<8} {:>10.2} {}\n", ticker.bold(), snapshot.price, change));
            if let Some(levels) = &snapshot.levels {
                let join = |values: &[f64]| {
                    values
                        .iter()
                        .map(|v| format!("{:.2}", v))
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                output.push_str(&format!(
                    "           support [{}]  resistance [{}]\n",
                    join(&levels.support),
                    join(&levels.resistance)
                ));
            }
        }
        output
    }

    fn format_calendar(events: &[MarketEvent]) -> String {
        let mut output = Self::section_header("Economic Calendar");
        for event in events {
            output.push_str(&format!(
                "  {} {} {}{}\n",
                event.date,
                event.time.as_deref().unwrap_or(""),
                event.event,
                event
                    .impact
                    .as_deref()
                    .map(|i| format!(" ({})", i))
                    .unwrap_or_default()
            ));
        }
        output
    }

    fn push_points(output: &mut String, title: &str, points: Option<&[String]>, bullet: &str) {
        let Some(points) = points.filter(|p| !p.is_empty()) else {
            return;
        };
        output.push_str(&format!("{}\n", title.dimmed()));
        for point in points {
            output.push_str(&format!("  {} {}\n", bullet, point));
        }
    }

    fn recommendation_label(recommendation: &str) -> ColoredString {
        let upper = recommendation.to_ascii_uppercase();
        if upper.contains("BUY") {
            recommendation.green().bold()
        } else if upper.contains("SELL") {
            recommendation.red().bold()
        } else {
            recommendation.yellow().bold()
        }
    }

    fn sentiment_label(sentiment: Sentiment) -> ColoredString {
        match sentiment {
            Sentiment::Bullish => "bullish".green(),
            Sentiment::Bearish => "bearish".red(),
            Sentiment::Neutral => "neutral".normal(),
        }
    }

    /// Paint text in a `#rrggbb` color, falling back to yellow
    pub fn paint(text: &str, hex: &str) -> ColoredString {
        match parse_hex_color(hex) {
            Some((r, g, b)) => text.truecolor(r, g, b),
            None => text.yellow(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

/// Parse `#rrggbb` (or `rrggbb`) into RGB components
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
