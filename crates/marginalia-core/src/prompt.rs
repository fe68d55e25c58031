//! Summarization prompts built from an analysis report.
//!
//! Nothing here talks to a model; callers send the text wherever they like.

use std::fmt::Write as _;

use crate::error::{AnalysisError, Result};
use crate::report::AnalysisReport;
use crate::taxonomy::Taxonomy;
use crate::types::Bookmark;

/// Instructions used for topics that declare no focus list
pub const DEFAULT_FOCUS: &[&str] = &[
    "Key themes and insights",
    "Practical takeaways",
    "Recommended actions",
    "Related resources",
    "Summary of main points",
];

const OVERVIEW_REQUESTS: &[&str] = &[
    "An executive summary of the reader's interests",
    "Key themes and patterns across topics",
    "Recommendations for learning paths",
    "Suggested areas for deeper exploration",
    "Connections between different topics",
];

const STUDY_GUIDE_SECTIONS: &[&str] = &[
    "Overview",
    "Key Concepts (with explanations)",
    "Practical Tips",
    "Action Steps",
    "Further Learning Resources",
];

const INSIGHT_REQUESTS: &[&str] = &[
    "Top 5 Key Insights (with brief explanations)",
    "Common Themes",
    "Surprising or Counter-intuitive Points",
    "Most Actionable Advice",
];

const ACTION_ITEM_FIELDS: &[&str] = &[
    "Task description",
    "Expected outcome",
    "Time/effort required",
    "Priority level (High/Medium/Low)",
];

const LEARNING_PATH_REQUESTS: &[&str] = &[
    "Learning objectives and goals",
    "Prerequisites and starting point",
    "Structured curriculum (beginner to intermediate to advanced)",
    "Estimated time for each section",
    "Hands-on projects and exercises",
    "Additional resources and references",
    "Skills assessment checkpoints",
    "Next steps after completion",
];

const TOOL_COMPARISON_REQUESTS: &[&str] = &[
    "Feature comparison table",
    "Use case recommendations",
    "Pros and cons of each tool",
    "Price/accessibility information if mentioned",
    "Overall recommendations based on different needs",
];

const DEEP_DIVE_REQUESTS: &[&str] = &[
    "Comprehensive topic overview",
    "Key insights and patterns",
    "Expert opinions and viewpoints mentioned",
    "Practical applications and use cases",
    "Future trends and predictions",
    "Resources for further exploration",
    "Action items and next steps",
];

/// Topics whose bookmarks feed a learning path
pub const LEARNING_TOPICS: &[&str] = &["education", "ai_ml", "programming"];

/// Topics whose bookmarks are all compared as tools
pub const TOOL_TOPICS: &[&str] = &["tools"];

/// Product names that pull a bookmark from any other topic into a comparison
pub const TOOL_TERMS: &[&str] = &["claude", "cursor", "gpt", "copilot", "agent"];

/// Characters of each bookmark quoted in a tool comparison
const TOOL_EXCERPT_CHARS: usize = 200;

/// Members of a deep-dive topic whose graph neighbors are consulted
const DEEP_DIVE_SEEDS: usize = 5;
const DEEP_DIVE_RELATED_PER_SEED: usize = 3;
const DEEP_DIVE_RELATED_TOTAL: usize = 10;

pub struct PromptBuilder<'a> {
    taxonomy: &'a Taxonomy,
    max_bookmarks: usize,
    overview_keywords: usize,
    learning_topics: Vec<String>,
    tool_topics: Vec<String>,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self {
            taxonomy,
            max_bookmarks: 50,
            overview_keywords: 5,
            learning_topics: LEARNING_TOPICS.iter().map(|t| t.to_string()).collect(),
            tool_topics: TOOL_TOPICS.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn learning_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.learning_topics = topics.into_iter().map(Into::into).collect();
        self
    }

    pub fn tool_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tool_topics = topics.into_iter().map(Into::into).collect();
        self
    }

    /// Cap on bookmarks quoted in a topic prompt
    pub fn max_bookmarks(mut self, max_bookmarks: usize) -> Self {
        self.max_bookmarks = max_bookmarks;
        self
    }

    pub fn overview_keywords(mut self, n: usize) -> Self {
        self.overview_keywords = n;
        self
    }

    /// Prompt asking for an analysis of one topic's bookmarks
    pub fn topic_prompt(&self, report: &AnalysisReport, topic: &str) -> Result<String> {
        if report.cluster(topic).is_none() {
            return Err(AnalysisError::UnknownTopic(topic.to_string()));
        }
        let members = report.bookmarks_for_topic(topic);
        let name = self.taxonomy.display_name(topic);

        let mut prompt = format!("Analyze these {name} related bookmarks:\n\n");
        for (i, bookmark) in members.iter().take(self.max_bookmarks).enumerate() {
            let _ = writeln!(prompt, "{}. {}\n", i + 1, flatten(&bookmark.text));
        }
        if members.len() > self.max_bookmarks {
            let _ = writeln!(
                prompt,
                "({} more bookmarks omitted)\n",
                members.len() - self.max_bookmarks
            );
        }

        let focus: Vec<&str> = match self.taxonomy.get(topic) {
            Some(def) if !def.focus.is_empty() => def.focus.iter().map(String::as_str).collect(),
            _ => DEFAULT_FOCUS.to_vec(),
        };
        prompt.push_str("Focus on:\n");
        push_numbered(&mut prompt, &focus);
        Ok(prompt)
    }

    /// Prompt asking for an overview across every topic
    pub fn overview_prompt(&self, report: &AnalysisReport) -> String {
        let mut prompt = String::from(
            "Create a comprehensive overview of the following bookmark topics from a reader's saved content:\n\n",
        );
        for cluster in report.topics_by_size() {
            let keywords = cluster
                .top_keywords(self.overview_keywords)
                .iter()
                .map(|k| k.term.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(
                prompt,
                "- {}: {} bookmarks, keywords: {}",
                self.taxonomy.display_name(&cluster.topic),
                cluster.len(),
                keywords
            );
        }
        if !report.unclassified.is_empty() {
            let _ = writeln!(prompt, "- Unclassified: {} bookmarks", report.unclassified.len());
        }
        prompt.push_str("\nPlease provide:\n");
        push_numbered(&mut prompt, OVERVIEW_REQUESTS);
        prompt
    }

    /// Study guide over the first bookmarks of the collection
    pub fn study_guide_prompt(&self, report: &AnalysisReport) -> String {
        let mut prompt = String::from(
            "Create a comprehensive study guide from these bookmarks. \
             Organize the content into clear sections with headings, key concepts, and practical examples:\n\n",
        );
        self.push_quoted(&mut prompt, report.bookmarks.iter());
        prompt.push_str("Format as a structured study guide with:\n");
        push_numbered(&mut prompt, STUDY_GUIDE_SECTIONS);
        prompt
    }

    pub fn insights_prompt(&self, report: &AnalysisReport) -> String {
        let mut prompt = String::from(
            "Extract the most valuable insights from these bookmarks. \
             Focus on unique, actionable, and thought-provoking ideas:\n\n",
        );
        self.push_quoted(&mut prompt, report.bookmarks.iter());
        prompt.push_str("Provide:\n");
        push_numbered(&mut prompt, INSIGHT_REQUESTS);
        prompt
    }

    pub fn action_items_prompt(&self, report: &AnalysisReport) -> String {
        let mut prompt = String::from(
            "Extract concrete action items from these bookmarks. \
             Focus on specific, implementable tasks:\n\n",
        );
        self.push_quoted(&mut prompt, report.bookmarks.iter());
        prompt.push_str("Create a prioritized list of action items with:\n");
        push_numbered(&mut prompt, ACTION_ITEM_FIELDS);
        prompt
    }

    /// Learning plan from the bookmarks of the learning topics, each quoted once
    pub fn learning_path_prompt(&self, report: &AnalysisReport) -> Result<String> {
        let bookmarks = self.collect_topics(report, &self.learning_topics, |_| true);
        if bookmarks.is_empty() {
            return Err(AnalysisError::NoBookmarks(self.learning_topics.clone()));
        }

        let content = bookmarks
            .iter()
            .take(self.max_bookmarks)
            .map(|b| {
                let author = if b.author.is_empty() { "unknown" } else { b.author.as_str() };
                format!("Source: @{author}\nContent: {}", flatten(&b.text))
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        let mut prompt = format!(
            "Create a structured learning path based on these educational bookmarks:\n\n{content}\n\nPlease provide:\n"
        );
        push_numbered(&mut prompt, LEARNING_PATH_REQUESTS);
        prompt.push_str("\n\nFormat as a practical, actionable learning plan.");
        Ok(prompt)
    }

    /// Comparison of tools: every bookmark of the tool topics, plus bookmarks
    /// elsewhere that name a known tool
    pub fn tool_comparison_prompt(&self, report: &AnalysisReport) -> Result<String> {
        let mut bookmarks = self.collect_topics(report, &self.tool_topics, |_| true);
        let other_topics: Vec<String> = report
            .clusters
            .keys()
            .filter(|topic| !self.tool_topics.contains(topic))
            .cloned()
            .collect();
        for bookmark in self.collect_topics(report, &other_topics, mentions_tool) {
            if !bookmarks.iter().any(|b| b.id == bookmark.id) {
                bookmarks.push(bookmark);
            }
        }
        if bookmarks.is_empty() {
            return Err(AnalysisError::NoBookmarks(self.tool_topics.clone()));
        }

        let mut prompt = String::from(
            "Compare and contrast the following tools/services mentioned in these bookmarks:\n\n",
        );
        for bookmark in bookmarks.iter().take(self.max_bookmarks) {
            let _ = writeln!(prompt, "- {}", excerpt(&bookmark.text, TOOL_EXCERPT_CHARS));
        }
        prompt.push_str("\nPlease provide:\n");
        push_numbered(&mut prompt, TOOL_COMPARISON_REQUESTS);
        Ok(prompt)
    }

    /// One topic's bookmarks plus their strongest graph neighbors outside it.
    ///
    /// Neighbors come from a bookmark-granularity graph; a topic graph
    /// contributes none.
    pub fn deep_dive_prompt(&self, report: &AnalysisReport, topic: &str) -> Result<String> {
        let cluster = report
            .cluster(topic)
            .ok_or_else(|| AnalysisError::UnknownTopic(topic.to_string()))?;
        let members = report.bookmarks_for_topic(topic);

        let mut related: Vec<&Bookmark> = Vec::new();
        for id in cluster.bookmark_ids.iter().take(DEEP_DIVE_SEEDS) {
            for (other, _) in report.graph.related(id, DEEP_DIVE_RELATED_PER_SEED) {
                if cluster.contains(other) || related.iter().any(|b| b.id == other) {
                    continue;
                }
                if let Some(bookmark) = report.bookmark(other) {
                    related.push(bookmark);
                }
            }
        }
        related.truncate(DEEP_DIVE_RELATED_TOTAL);

        let name = self.taxonomy.display_name(topic);
        let mut prompt = format!(
            "Perform a deep dive analysis on the topic: {name}\n\nMain bookmarks on this topic:\n"
        );
        for bookmark in members.iter().take(self.max_bookmarks) {
            let _ = writeln!(prompt, "- {}", flatten(&bookmark.text));
        }
        prompt.push_str("\nRelated bookmarks from other topics:\n");
        if related.is_empty() {
            prompt.push_str("- (none)\n");
        }
        for bookmark in &related {
            let _ = writeln!(prompt, "- {}", flatten(&bookmark.text));
        }
        prompt.push_str("\nPlease provide:\n");
        push_numbered(&mut prompt, DEEP_DIVE_REQUESTS);
        Ok(prompt)
    }

    fn push_quoted<'r>(&self, prompt: &mut String, bookmarks: impl Iterator<Item = &'r Bookmark>) {
        for bookmark in bookmarks.take(self.max_bookmarks) {
            let _ = writeln!(prompt, "Bookmark: {}\n", flatten(&bookmark.text));
        }
    }

    /// Members of `topics` in topic order, each bookmark once
    fn collect_topics<'r>(
        &self,
        report: &'r AnalysisReport,
        topics: &[String],
        keep: impl Fn(&Bookmark) -> bool,
    ) -> Vec<&'r Bookmark> {
        let mut bookmarks: Vec<&Bookmark> = Vec::new();
        for topic in topics {
            for bookmark in report.bookmarks_for_topic(topic) {
                if keep(bookmark) && !bookmarks.iter().any(|b| b.id == bookmark.id) {
                    bookmarks.push(bookmark);
                }
            }
        }
        bookmarks
    }
}

fn mentions_tool(bookmark: &Bookmark) -> bool {
    let text = bookmark.text.to_lowercase();
    TOOL_TERMS.iter().any(|term| text.contains(term))
}

fn flatten(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn excerpt(text: &str, max_chars: usize) -> String {
    let flat = flatten(text);
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

fn push_numbered(prompt: &mut String, items: &[&str]) {
    let lines: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect();
    prompt.push_str(&lines.join("\n"));
}

/// Rough token count, four characters per token
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}
