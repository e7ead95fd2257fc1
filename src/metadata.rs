//! Platform metadata: video titles, descriptions, tags, and keywords
//!
//! The description follows a fixed layout: optional promo lead, the
//! duration/vibe line, the focus pitch, a timestamped tracklist, optional
//! promo outro, hashtags, then SEO keywords. Titles come from the
//! generative model when configured, otherwise from hook/template
//! combinations.

use crate::config::MetadataConfig;
use crate::gemini::GeminiClient;
use crate::presets::{youtube_title_prompt, GenrePreset};
use crate::types::TrackSummary;
use crate::utils::format_timestamp;
use rand::seq::SliceRandom;
use tracing::{info, warn};

/// Platform title length limit
const MAX_TITLE_CHARS: usize = 100;

/// Assumed track length when the API reported none
const DEFAULT_TRACK_SECS: f64 = 180.0;

const DEFAULT_VIBE: &str =
    "Atmospheric electronic music designed for peak cognitive performance and deep focus.";

const FOCUS_PITCH: &str = "Perfect for deep coding sessions, technical problem-solving, \
     system design, and late-night hacking.";

/// Power words mixed into template titles
const TITLE_HOOKS: [&str; 30] = [
    "Ultrahuman Focus",
    "Unstoppable Deep Work",
    "Peak Performance",
    "Limitless Clarity",
    "Elite Focus",
    "Absolute Concentration",
    "Unbreakable Flow",
    "Maximum Output",
    "Zero Distractions",
    "Laser Precision",
    "Infinite Momentum",
    "Pure Focus State",
    "Relentless Clarity",
    "Superhuman Flow",
    "Total Immersion",
    "Locked In",
    "Unwavering Focus",
    "God Mode",
    "Tunnel Vision",
    "Mental Fortress",
    "Prime State",
    "Cognitive Surge",
    "Beast Mode",
    "Deep Code",
    "Silent Mastery",
    "Monk Mode",
    "Grind State",
    "Flow Protocol",
    "Dark Focus",
    "Productivity",
];

/// Title shapes; `{hook}`, `{genre}` and `{duration}` are substituted
const TITLE_TEMPLATES: [&str; 15] = [
    "{hook}: {genre} for Coding & Focus",
    "{duration}+ Hours {genre} | Deep Work Music",
    "{genre} Mix for Programmers | {hook}",
    "Code to This: {genre} | {hook}",
    "{hook} | {genre} Coding Music",
    "The Ultimate {genre} Coding Session",
    "{duration} Hours {genre} | Enter Flow State",
    "Late Night Coding | {genre} Mix",
    "{hook}: Programming Music | {genre}",
    "Deep Work {genre} | {hook} Mode",
    "Coding Playlist | {genre} | {hook}",
    "{genre} for Developers | {hook}",
    "Focus Music for Coders | {genre}",
    "{hook} | {duration}h {genre} Mix",
    "Developer Vibes | {genre} | {hook}",
];

/// Generates titles and descriptions for a finished mix
pub struct MetadataGenerator {
    config: MetadataConfig,
    gemini: Option<GeminiClient>,
}

impl MetadataGenerator {
    /// Create a generator; without a client titles come from templates
    pub fn new(config: MetadataConfig, gemini: Option<GeminiClient>) -> Self {
        Self { config, gemini }
    }

    /// Generate the video title
    ///
    /// The model's answer is stripped of surrounding quotes; an empty or
    /// over-length answer (and any API failure) falls back to a
    /// hook/template title.
    pub async fn video_title(&self, preset: &GenrePreset, mood: &str, duration_hours: u64) -> String {
        let Some(client) = &self.gemini else {
            return template_title(preset.name, duration_hours);
        };

        let prompt = youtube_title_prompt(preset.name, mood, duration_hours);
        match client.generate_text(&prompt).await {
            Ok(raw) => {
                let title = raw.trim_matches(|c| matches!(c, '"' | '\'')).to_string();
                if title.is_empty() || title.chars().count() > MAX_TITLE_CHARS {
                    warn!(
                        chars = title.chars().count(),
                        "model title unusable, using a template"
                    );
                    template_title(preset.name, duration_hours)
                } else {
                    info!(title = %title, "generated video title");
                    title
                }
            }
            Err(e) => {
                warn!(error = %e, "video title generation failed, using a template");
                template_title(preset.name, duration_hours)
            }
        }
    }

    /// Build the full video description
    pub fn description(
        &self,
        preset: &GenrePreset,
        mood: &str,
        duration_secs: f64,
        tracks: &[TrackSummary],
    ) -> String {
        let mut sections: Vec<String> = Vec::new();

        if let Some(lead) = &self.config.promo_lead {
            sections.push(format!("{lead}\n\n---"));
        }
        sections.push(format!(
            "{} of {}. {}",
            format_duration(duration_secs),
            preset.name,
            genre_vibe(preset.key),
        ));
        sections.push(FOCUS_PITCH.to_string());
        sections.push(format!("Tracklist:\n{}", build_tracklist(tracks)));
        if let Some(outro) = &self.config.promo_outro {
            sections.push(outro.clone());
        }
        sections.push(hashtags(mood, preset.name).join(" "));
        sections.push(keywords(mood, preset.name).join(", "));

        sections.join("\n\n")
    }
}

/// "2 Hours 14 Minutes" / "45 Minutes" style duration
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    if hours > 0 {
        let unit = if hours > 1 { "Hours" } else { "Hour" };
        format!("{hours} {unit} {minutes} Minutes")
    } else {
        format!("{minutes} Minutes")
    }
}

/// One "timestamp - title" line per track, timestamps accumulating
pub(crate) fn build_tracklist(tracks: &[TrackSummary]) -> String {
    let mut lines = Vec::with_capacity(tracks.len());
    let mut elapsed = 0.0_f64;
    for track in tracks {
        lines.push(format!("{} - {}", format_timestamp(elapsed as u64), track.title));
        elapsed += if track.duration > 0.0 {
            track.duration
        } else {
            DEFAULT_TRACK_SECS
        };
    }
    lines.join("\n")
}

/// Random hook/template title
pub fn template_title(genre_name: &str, duration_hours: u64) -> String {
    let mut rng = rand::thread_rng();
    let template = TITLE_TEMPLATES
        .choose(&mut rng)
        .unwrap_or(&TITLE_TEMPLATES[0]);
    let hook = TITLE_HOOKS.choose(&mut rng).unwrap_or(&TITLE_HOOKS[0]);
    template
        .replace("{hook}", hook)
        .replace("{genre}", genre_name)
        .replace("{duration}", &duration_hours.to_string())
}

/// Platform tags for the video
pub fn tags(mood: &str, genre_name: &str) -> Vec<String> {
    let genre = genre_name.to_lowercase();
    let mood = mood.to_lowercase();
    vec![
        "coding music".to_string(),
        "programming music".to_string(),
        "deep work music".to_string(),
        "focus music".to_string(),
        "study music".to_string(),
        "concentration music".to_string(),
        "work music".to_string(),
        "productivity music".to_string(),
        genre.clone(),
        format!("{genre} mix"),
        "music for coding".to_string(),
        "music for programming".to_string(),
        "developer music".to_string(),
        "software engineer music".to_string(),
        mood.clone(),
        format!("{mood} music"),
    ]
}

/// Hashtags appended to the description
pub fn hashtags(mood: &str, genre_name: &str) -> Vec<String> {
    vec![
        "#CodingMusic".to_string(),
        "#DeepWork".to_string(),
        "#ProgrammingMusic".to_string(),
        "#FocusMusic".to_string(),
        "#StudyMusic".to_string(),
        "#FlowState".to_string(),
        "#ProductivityMusic".to_string(),
        format!("#{}", genre_name.replace(' ', "")),
        format!("#{}", title_case(mood)),
        "#TechMusic".to_string(),
    ]
}

/// SEO keywords for the end of the description
pub fn keywords(mood: &str, genre_name: &str) -> Vec<String> {
    let genre = genre_name.to_lowercase();
    let mood = mood.to_lowercase();
    vec![
        "coding music".to_string(),
        "programming music".to_string(),
        "deep work".to_string(),
        "focus music for coding".to_string(),
        "study music".to_string(),
        "concentration music".to_string(),
        format!("{genre} for coding"),
        "music for programmers".to_string(),
        "developer playlist".to_string(),
        "software engineer music".to_string(),
        "work from home music".to_string(),
        "lo-fi coding".to_string(),
        "ambient coding music".to_string(),
        format!("{mood} music"),
        "productivity playlist".to_string(),
        "music for deep focus".to_string(),
        "coding playlist".to_string(),
        "hacking music".to_string(),
        "late night coding".to_string(),
        "flow state music".to_string(),
    ]
}

/// Genre-flavored description copy, keyed by preset key
pub(crate) fn genre_vibe(genre: &str) -> &'static str {
    match genre {
        "dark_synthwave" => {
            "Dreamy, nostalgic synthwave with neon-lit highways and retro-futuristic \
             warmth to carry your late-night coding sessions."
        }
        "deep_house" => {
            "Warm, rolling basslines and hypnotic grooves that create the perfect flow \
             state for extended programming sprints."
        }
        "ambient_electronic" => {
            "Ethereal soundscapes and gentle rhythms that calm the mind while \
             maintaining razor-sharp focus on complex problems."
        }
        "lofi_beats" => {
            "Dusty, nostalgic beats with jazzy undertones that transform your workspace \
             into a cozy productivity sanctuary."
        }
        "minimal_techno" => {
            "Hypnotic, repetitive patterns that drive deep concentration and eliminate \
             mental noise during intensive technical work."
        }
        "neo_classical" => {
            "Emotional piano melodies and subtle strings that inspire creativity while \
             maintaining deep focus."
        }
        _ => DEFAULT_VIBE,
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeminiConfig;
    use crate::presets::preset;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn summaries(entries: &[(&str, f64)]) -> Vec<TrackSummary> {
        entries
            .iter()
            .map(|(title, duration)| TrackSummary {
                title: (*title).to_string(),
                duration: *duration,
            })
            .collect()
    }

    fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::new(&GeminiConfig {
            api_key: "test-key".to_string(),
            base_url: server.uri(),
            text_model: "gemini-2.0-flash".to_string(),
            image_model: "gemini-3-pro-image-preview".to_string(),
        })
        .unwrap()
    }

    async fn mount_title(server: &MockServer, body: &str) {
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": body }] } }]
            })))
            .mount(server)
            .await;
    }

    #[test]
    fn durations_format_with_hour_pluralization() {
        assert_eq!(format_duration(3600.0), "1 Hour 0 Minutes");
        assert_eq!(format_duration(7380.0), "2 Hours 3 Minutes");
        assert_eq!(format_duration(2700.0), "45 Minutes");
        assert_eq!(format_duration(59.0), "0 Minutes");
    }

    #[test]
    fn tracklist_timestamps_accumulate() {
        let tracks = summaries(&[
            ("Neon Grid", 181.5),
            ("Hollow Signal", 243.2),
            ("Static Veil", 0.0),
            ("Iron Core Loop", 195.0),
        ]);
        let tracklist = build_tracklist(&tracks);
        let lines: Vec<&str> = tracklist.lines().collect();
        assert_eq!(lines[0], "0:00 - Neon Grid");
        assert_eq!(lines[1], "3:01 - Hollow Signal");
        assert_eq!(lines[2], "7:04 - Static Veil");
        // the zero-length entry advances by the three-minute default
        assert_eq!(lines[3], "10:04 - Iron Core Loop");
    }

    #[test]
    fn description_carries_promos_in_order() {
        let generator = MetadataGenerator::new(
            MetadataConfig {
                promo_lead: Some("Free tutorials: https://example.com/news".to_string()),
                promo_outro: Some("Join the community: https://example.com/chat".to_string()),
                ..MetadataConfig::default()
            },
            None,
        );
        let preset = preset("deep_house").unwrap();
        let tracks = summaries(&[("Sunken Chamber Pulse", 200.0)]);
        let description = generator.description(preset, "FOCUS", 7260.0, &tracks);

        assert!(description.starts_with("Free tutorials: https://example.com/news\n\n---"));
        assert!(description.contains("2 Hours 1 Minutes of Chill Deep House."));
        assert!(description.contains("rolling basslines"));
        assert!(description.contains("Tracklist:\n0:00 - Sunken Chamber Pulse"));
        assert!(description.contains("Join the community: https://example.com/chat"));

        let hashtag_at = description.find("#CodingMusic").unwrap();
        let keywords_at = description.find("coding music, programming music").unwrap();
        assert!(hashtag_at < keywords_at, "hashtags come before keywords");
    }

    #[test]
    fn description_without_promos_starts_at_the_duration_line() {
        let generator = MetadataGenerator::new(MetadataConfig::default(), None);
        let preset = preset("lofi_beats").unwrap();
        let description =
            generator.description(preset, "CALM", 1500.0, &summaries(&[("Grey Analog Loops", 100.0)]));

        assert!(description.starts_with("25 Minutes of Lo-Fi Chill."));
        assert!(!description.contains("---"));
    }

    #[test]
    fn unknown_genre_gets_the_default_vibe() {
        assert_eq!(genre_vibe("vaporwave"), DEFAULT_VIBE);
        assert_ne!(genre_vibe("minimal_techno"), DEFAULT_VIBE);
    }

    #[test]
    fn template_titles_substitute_every_placeholder() {
        for _ in 0..25 {
            let title = template_title("Chill Deep House", 2);
            assert!(!title.contains('{') && !title.contains('}'), "title: {title}");
            assert!(title.contains("Chill Deep House"), "title: {title}");
        }
    }

    #[test]
    fn tag_banks_have_stable_shapes() {
        let tags = tags("FOCUS", "Minimal Electronic");
        assert_eq!(tags.len(), 16);
        assert!(tags.contains(&"minimal electronic mix".to_string()));
        assert!(tags.contains(&"focus music".to_string()));

        let hashtags = hashtags("FOCUS", "Minimal Electronic");
        assert_eq!(hashtags.len(), 10);
        assert!(hashtags.contains(&"#MinimalElectronic".to_string()));
        assert!(hashtags.contains(&"#Focus".to_string()));

        let keywords = keywords("FOCUS", "Minimal Electronic");
        assert_eq!(keywords.len(), 20);
        assert!(keywords.contains(&"minimal electronic for coding".to_string()));
    }

    #[tokio::test]
    async fn video_title_without_api_uses_a_template() {
        let generator = MetadataGenerator::new(MetadataConfig::default(), None);
        let title = generator
            .video_title(preset("deep_house").unwrap(), "FOCUS", 2)
            .await;
        assert!(title.contains("Chill Deep House"));
    }

    #[tokio::test]
    async fn model_titles_are_stripped_of_wrapping_quotes() {
        let server = MockServer::start().await;
        mount_title(&server, "\"Deep Focus: Chill Deep House for Late-Night Coding\"").await;

        let generator =
            MetadataGenerator::new(MetadataConfig::default(), Some(client_for(&server)));
        let title = generator
            .video_title(preset("deep_house").unwrap(), "FOCUS", 2)
            .await;
        assert_eq!(title, "Deep Focus: Chill Deep House for Late-Night Coding");
    }

    #[tokio::test]
    async fn overlong_model_titles_fall_back_to_templates() {
        let server = MockServer::start().await;
        let long_title = "x".repeat(120);
        mount_title(&server, &long_title).await;

        let generator =
            MetadataGenerator::new(MetadataConfig::default(), Some(client_for(&server)));
        let title = generator
            .video_title(preset("deep_house").unwrap(), "FOCUS", 2)
            .await;
        assert!(title.chars().count() <= MAX_TITLE_CHARS);
        assert!(title.contains("Chill Deep House"));
    }

    #[tokio::test]
    async fn api_failure_falls_back_to_templates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let generator =
            MetadataGenerator::new(MetadataConfig::default(), Some(client_for(&server)));
        let title = generator
            .video_title(preset("minimal_techno").unwrap(), "GRIND", 3)
            .await;
        assert!(title.contains("Minimal Electronic"));
    }
}
