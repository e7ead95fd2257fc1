//! Genre presets, word banks, and prompt templates

use crate::error::{Error, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// A genre preset: everything needed to request tracks in a consistent style
#[derive(Clone, Copy, Debug)]
pub struct GenrePreset {
    /// Stable lookup key (e.g. "dark_synthwave")
    pub key: &'static str,
    /// Human-readable display name
    pub name: &'static str,
    /// Style tags sent with each generation request
    pub style: &'static str,
    /// Full generation prompt
    pub prompt: &'static str,
    /// Nominal tempo, used in manifests and metadata
    pub bpm: u32,
    /// Comma-separated tags the generator should avoid
    pub negative_tags: &'static str,
}

static GENRE_PRESETS: [GenrePreset; 6] = [
    GenrePreset {
        key: "dark_synthwave",
        name: "Dreamy Synthwave",
        style: "80s synthwave, dreamy retrowave, nostalgic outrun, emotional synthwave",
        prompt: "Dreamy 80s synthwave with nostalgic emotional vibes.\n\
            Lush analog synthesizers, warm pads, shimmering arpeggios, gentle pulsing bass.\n\
            Nostalgic sunset drives and neon-lit nights. Emotional and cinematic.\n\
            Gated reverb drums, chorus-drenched leads, ethereal synth melodies. Bittersweet and hopeful. 92 BPM.",
        bpm: 92,
        negative_tags: "vocals, singing, saxophone, sax, harsh, industrial, aggressive, heavy, distorted",
    },
    GenrePreset {
        key: "deep_house",
        name: "Chill Deep House",
        style: "Chill deep house, smooth electronic, laid-back grooves",
        prompt: "Smooth chill deep house perfect for focused work sessions.\n\
            Warm rolling basslines, soft Rhodes chords, gentle shuffling percussion.\n\
            Mellow filtered pads, subtle grooves, relaxed atmosphere.\n\
            Coffee shop meets late-night lounge. Unobtrusive yet engaging. 110 BPM.",
        bpm: 110,
        negative_tags: "vocals, drops, aggressive, intense, buildup, mainstream edm, harsh",
    },
    GenrePreset {
        key: "ambient_electronic",
        name: "Ambient Focus",
        style: "Ambient electronic, peaceful soundscape, atmospheric focus music",
        prompt: "Peaceful ambient electronic soundscape for deep concentration.\n\
            Slowly evolving pads, gentle textures, spacious atmospheres.\n\
            Soft drones, subtle melodic fragments, calming washes of sound.\n\
            Like floating through clouds. Meditative and serene. Perfect for deep work. 70 BPM.",
        bpm: 70,
        negative_tags: "vocals, drums, percussion, harsh, intense, fast, aggressive",
    },
    GenrePreset {
        key: "lofi_beats",
        name: "Lo-Fi Chill",
        style: "Lo-fi hip hop, chill beats, jazzy lo-fi, study music",
        prompt: "Warm lo-fi hip hop beats perfect for studying and coding.\n\
            Mellow jazzy samples, soft dusty drums, gentle vinyl crackle.\n\
            Smooth Rhodes chords, laid-back grooves, cozy late-night vibes.\n\
            Like a rainy afternoon with coffee. Nostalgic and comforting. 85 BPM.",
        bpm: 85,
        negative_tags: "vocals, singing, intense, fast, aggressive, harsh, loud",
    },
    GenrePreset {
        key: "minimal_techno",
        name: "Minimal Electronic",
        style: "Minimal electronic, downtempo, hypnotic grooves, subtle techno",
        prompt: "Minimal electronic with hypnotic subtle grooves for focused work.\n\
            Soft clicks and gentle percussion, warm filtered basslines.\n\
            Slowly evolving patterns, understated melodies, spacious mix.\n\
            Repetitive but not intrusive. Background texture for concentration. 100 BPM.",
        bpm: 100,
        negative_tags: "vocals, aggressive, pounding, harsh, loud, intense, drops",
    },
    GenrePreset {
        key: "neo_classical",
        name: "Neo Classical",
        style: "Neo classical, modern classical, cinematic piano, orchestral ambient",
        prompt: "Gentle neo-classical music blending piano with soft electronic textures.\n\
            Delicate piano melodies, subtle string arrangements, ambient pads.\n\
            Emotional and introspective modern classical with minimalist sensibility.\n\
            Warm and contemplative. Beautiful background for creative work. 75 BPM.",
        bpm: 75,
        negative_tags: "vocals, drums, harsh, loud, fast, aggressive, intense",
    },
];

/// Three-tier word banks for fallback track titles, one bank per genre.
/// Unknown genres fall back to the first bank.
static TITLE_WORDS: [(&str, [[&str; 10]; 3]); 6] = [
    (
        "dark_synthwave",
        [
            [
                "Neon", "Golden", "Velvet", "Distant", "Fading", "Electric", "Violet", "Amber",
                "Midnight", "Sunset",
            ],
            [
                "Highway", "Dreams", "Horizon", "Memories", "Skyline", "Coast", "Summer",
                "Escape", "Paradise", "Waves",
            ],
            [
                "Drive", "Drift", "Echoes", "Glow", "Reflections", "Reverie", "Promise",
                "Return", "Embrace", "Journey",
            ],
        ],
    ),
    (
        "deep_house",
        [
            [
                "Hollow", "Submerged", "Distant", "Veiled", "Shadowed", "Buried", "Midnight",
                "Sunken", "Lost", "Frozen",
            ],
            [
                "Warehouse", "Bunker", "Tunnel", "Depths", "Basement", "Underground", "Sector",
                "Chamber", "Void", "Cavern",
            ],
            [
                "Pulse", "Echo", "Drift", "Descent", "Current", "Signal", "Motion", "Ritual",
                "Passage", "Transmission",
            ],
        ],
    ),
    (
        "ambient_electronic",
        [
            [
                "Distant", "Hollow", "Fading", "Cold", "Empty", "Lost", "Frozen", "Buried",
                "Silent", "Void",
            ],
            [
                "Horizon", "Wasteland", "Grid", "Expanse", "Threshold", "Boundary", "Abyss",
                "Sector", "Zone", "Edge",
            ],
            [
                "Signals", "Echoes", "Remnants", "Ghosts", "Traces", "Fragments", "Memories",
                "Transmissions", "Static", "Drift",
            ],
        ],
    ),
    (
        "lofi_beats",
        [
            [
                "Dark", "Broken", "Hollow", "Static", "Glitch", "Distant", "Faded", "Void",
                "Grey", "Shadowed",
            ],
            [
                "Circuit", "Terminal", "Basement", "Underground", "Concrete", "Midnight",
                "Urban", "Digital", "Neon", "Analog",
            ],
            [
                "Signals", "Fragments", "Noise", "Decay", "Static", "Dreams", "Echoes",
                "Transmissions", "Loops", "Sessions",
            ],
        ],
    ),
    (
        "minimal_techno",
        [
            [
                "Stark", "Cold", "Raw", "Mono", "Void", "Grid", "Black", "Steel", "Iron",
                "Null",
            ],
            [
                "Sector", "Node", "Block", "Cell", "Unit", "Phase", "Vector", "Zone",
                "Terminal", "Core",
            ],
            [
                "Machine", "System", "Pattern", "Sequence", "Matrix", "Code", "Process",
                "Function", "Protocol", "Loop",
            ],
        ],
    ),
    (
        "neo_classical",
        [
            [
                "Fallen", "Distant", "Fading", "Silent", "Cold", "Hollow", "Dark", "Lost",
                "Buried", "Frozen",
            ],
            [
                "Empire", "Kingdom", "Throne", "Skyline", "Horizon", "Monument", "Cathedral",
                "Tower", "Citadel", "Ruins",
            ],
            [
                "Descent", "Requiem", "Elegy", "Collapse", "Awakening", "Departure", "Ending",
                "Reckoning", "Echo", "Legacy",
            ],
        ],
    ),
];

/// Mood words rendered onto thumbnails and used in metadata
pub const MOOD_WORDS: [&str; 20] = [
    "FLOW",
    "FOCUS",
    "CLARITY",
    "PROGRESS",
    "DISCIPLINE",
    "DRIVE",
    "VISION",
    "MOMENTUM",
    "AMBITION",
    "THRIVE",
    "GRIND",
    "RISE",
    "FORGE",
    "PEAK",
    "DEPTH",
    "CALM",
    "EXECUTE",
    "CREATE",
    "BUILD",
    "MASTERY",
];

const TITLE_PROMPT_TEMPLATE: &str = r#"You are naming tracks for a dark, electronic focus music mix.

Genre: {genre_name}
Style: {style}
Number of titles needed: {count}

Aesthetic inspiration: Tron Legacy, Blade Runner, cyberpunk, dystopian futures,
neon-noir, late-night coding sessions, dark warehouses, digital grids.

Generate {count} unique, evocative track titles. Each title should:
- Be 2-4 words long
- Feel dark, moody, and electronic
- Evoke digital/technological imagery (grids, circuits, signals, voids)
- Be poetic and memorable, not generic
- Avoid happy, warm, or bright imagery
- Sound like they belong on a Tron or Blade Runner soundtrack

Output ONLY the titles, one per line. No numbering, no explanations."#;

/// Prompt for generating a unique thumbnail image prompt
pub const THUMBNAIL_PROMPT: &str = r#"You are a creative director for a coding/focus music YouTube channel.
Generate a unique, detailed image prompt for a YouTube thumbnail.

Theme: Dark, moody, atmospheric scenes with soft diffuse lighting.

Vary between these scene types:
- Silhouette of person at monitors during blue hour, soft city lights in background
- Minimalist workspace at golden hour, warm light diffusing through windows
- Back view of developer in glass-walled space at dusk, muted city skyline
- Cozy cabin workspace at dawn, soft morning mist outside
- Rooftop setup during early evening, subtle warm and cool tones mixing
- Dark office at night with soft ambient screen glow, city out of focus below

Time of day (vary between):
- Early morning / dawn with soft diffuse light
- Golden hour / early evening with warm muted tones
- Nighttime with subtle ambient lighting

Style requirements:
- MUST be landscape/widescreen (16:9 aspect ratio)
- Dark and moody overall tone
- Soft, diffuse lighting - no harsh light sources
- Cinematic contrast with deep shadows
- Muted, desaturated color palette - NO oversaturated colors
- Cool blues and teals with occasional subtle warm accents
- Film grain, photorealistic, ultra-wide angle
- Can include silhouette/back of person (adds scale and relatability)
- No faces visible, no text, no watermarks

Output ONLY the image prompt. Be specific and vivid. Emphasize soft lighting and muted colors."#;

const YOUTUBE_TITLE_PROMPT_TEMPLATE: &str = r#"You are naming a long-form coding/focus music mix for YouTube.

Genre: {genre_name}
Mood word: {mood}
Length: about {duration_hours} hours

Write ONE YouTube title that:
- Is under 90 characters
- Mentions the genre and that this is music for coding or deep work
- Feels bold and specific, never clickbait
- Uses no emoji and no ALL CAPS words

Output ONLY the title. No quotes, no explanations."#;

/// Render the track-title prompt for a genre
pub fn title_prompt(genre_name: &str, style: &str, count: usize) -> String {
    TITLE_PROMPT_TEMPLATE
        .replace("{genre_name}", genre_name)
        .replace("{style}", style)
        .replace("{count}", &count.to_string())
}

/// Render the video-title prompt for a finished mix
pub fn youtube_title_prompt(genre_name: &str, mood: &str, duration_hours: u64) -> String {
    YOUTUBE_TITLE_PROMPT_TEMPLATE
        .replace("{genre_name}", genre_name)
        .replace("{mood}", mood)
        .replace("{duration_hours}", &duration_hours.to_string())
}

/// All known genre presets
pub fn all_presets() -> &'static [GenrePreset] {
    &GENRE_PRESETS
}

/// Look up a genre preset by key
///
/// # Errors
///
/// Returns [`Error::NotFound`] listing the available keys when the genre is
/// unknown.
pub fn preset(genre: &str) -> Result<&'static GenrePreset> {
    GENRE_PRESETS
        .iter()
        .find(|preset| preset.key == genre)
        .ok_or_else(|| {
            let available = GENRE_PRESETS
                .iter()
                .map(|preset| preset.key)
                .collect::<Vec<_>>()
                .join(", ");
            Error::NotFound(format!("unknown genre '{genre}' (available: {available})"))
        })
}

fn title_words(genre: &str) -> &'static [[&'static str; 10]; 3] {
    TITLE_WORDS
        .iter()
        .find(|(key, _)| *key == genre)
        .map(|(_, words)| words)
        .unwrap_or(&TITLE_WORDS[0].1)
}

// Stable across runs, unlike the default hasher
fn genre_seed(genre: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in genre.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash % 1000
}

/// Deterministic title for a genre/index pair
///
/// Seeds a local RNG from the genre and index, so repeated calls agree and
/// nothing else observes the draw.
pub fn seeded_title(genre: &str, index: usize) -> String {
    let words = title_words(genre);
    let mut rng = StdRng::seed_from_u64((index as u64).wrapping_mul(31).wrapping_add(genre_seed(genre)));
    format!(
        "{} {} {}",
        words[0][rng.gen_range(0..words[0].len())],
        words[1][rng.gen_range(0..words[1].len())],
        words[2][rng.gen_range(0..words[2].len())],
    )
}

/// Random unique titles from a genre's word banks
///
/// Draws until `count` distinct titles are collected, giving up after
/// `count * 10` attempts; the result can therefore come up short when `count`
/// approaches the size of the combination space.
pub fn fallback_titles(genre: &str, count: usize) -> Vec<String> {
    fallback_titles_with(&mut rand::thread_rng(), genre, count)
}

fn fallback_titles_with<R: Rng>(rng: &mut R, genre: &str, count: usize) -> Vec<String> {
    let words = title_words(genre);
    let mut titles: Vec<String> = Vec::with_capacity(count);
    let max_attempts = count * 10;
    let mut attempts = 0;

    while titles.len() < count && attempts < max_attempts {
        let title = format!(
            "{} {} {}",
            words[0][rng.gen_range(0..words[0].len())],
            words[1][rng.gen_range(0..words[1].len())],
            words[2][rng.gen_range(0..words[2].len())],
        );
        if !titles.contains(&title) {
            titles.push(title);
        }
        attempts += 1;
    }

    titles
}
