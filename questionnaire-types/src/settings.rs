//! Typed settings for the interactive question types.
//!
//! Each struct mirrors the JSON object stored under a question's `settings`
//! key. Every field is optional on the wire: missing keys take the builder's
//! defaults, and keys these structs do not know about are kept aside by the
//! owning [`Question`](crate::Question) so they survive a save.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Declare a settings enum stored as a plain string. Names this editor does
/// not know are kept in `Other` and written back unchanged.
macro_rules! settings_enum {
    (
        $(#[$meta:meta])*
        $name:ident (default $default:ident) {
            $($variant:ident => $tag:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $tag,)+
                    Self::Other(other) => other,
                }
            }

            pub fn parse(s: &str) -> Self {
                match s {
                    $($tag => Self::$variant,)+
                    _ => Self::Other(s.to_string()),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(Self::parse(&s))
            }
        }
    };
}

settings_enum! {
    /// Layout direction shared by several widgets.
    Orientation (default Horizontal) {
        Horizontal => "horizontal",
        Vertical => "vertical",
        Circular => "circular",
    }
}

settings_enum! {
    /// Rendering size shared by several widgets.
    WidgetSize (default Md) {
        Sm => "sm",
        Md => "md",
        Lg => "lg",
        Xl => "xl",
    }
}

/// An image shown for a particular scale value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueImage {
    pub value: f64,
    pub image_url: String,
}

// ---------------------------------------------------------------------------
// Slider scale
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderLabels {
    pub start: String,
    pub middle: String,
    pub end: String,
}

impl Default for SliderLabels {
    fn default() -> Self {
        Self {
            start: "Low".to_string(),
            middle: String::new(),
            end: "High".to_string(),
        }
    }
}

/// Continuous slider with labelled ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SliderScaleSettings {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub orientation: Orientation,
    pub labels: SliderLabels,
    pub show_value: bool,
    pub show_ticks: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_images: Option<Vec<ValueImage>>,
}

impl Default for SliderScaleSettings {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            step: 1.0,
            orientation: Orientation::Horizontal,
            labels: SliderLabels::default(),
            show_value: true,
            show_ticks: true,
            track_color: None,
            active_color: None,
            height: None,
            custom_images: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Dial gauge
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeLabel {
    pub value: f64,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    #[serde(alias = "offset")]
    pub percent: f64,
    pub color: String,
}

settings_enum! {
    /// `gradient` is what the builder seeds; the participant view draws
    /// `semi-circle` and `full-circle` dials.
    GaugeType (default Gradient) {
        Gradient => "gradient",
        Segments => "segments",
        SemiCircle => "semi-circle",
        FullCircle => "full-circle",
    }
}

/// Semicircular gauge with coloured zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DialGaugeSettings {
    pub min: f64,
    pub max: f64,
    pub labels: Vec<GaugeLabel>,
    pub gauge_type: GaugeType,
    pub color_stops: Vec<ColorStop>,
    pub size: WidgetSize,
    pub show_value: bool,
}

impl Default for DialGaugeSettings {
    fn default() -> Self {
        let label = |value: f64, label: &str, color: &str| GaugeLabel {
            value,
            label: label.to_string(),
            color: Some(color.to_string()),
        };
        let stop = |percent: f64, color: &str| ColorStop {
            percent,
            color: color.to_string(),
        };
        Self {
            min: 0.0,
            max: 10.0,
            labels: vec![
                label(0.0, "Poor", "#ef4444"),
                label(5.0, "Average", "#f59e0b"),
                label(10.0, "Excellent", "#22c55e"),
            ],
            gauge_type: GaugeType::Gradient,
            color_stops: vec![
                stop(0.0, "#ef4444"),
                stop(50.0, "#f59e0b"),
                stop(100.0, "#22c55e"),
            ],
            size: WidgetSize::Md,
            show_value: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Visual Likert
// ---------------------------------------------------------------------------

settings_enum! {
    IconStyle (default Emoji) {
        Emoji => "emoji",
        Face => "face",
        Simple => "simple",
        Filled => "filled",
        Outline => "outline",
        Custom => "custom",
    }
}

/// Agreement scale rendered with icons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LikertVisualSettings {
    pub scale: u32,
    pub labels: Vec<String>,
    pub show_labels: bool,
    pub show_icons: bool,
    pub icon_style: IconStyle,
    pub size: WidgetSize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_images: Option<Vec<ValueImage>>,
}

impl Default for LikertVisualSettings {
    fn default() -> Self {
        Self {
            scale: 5,
            labels: agreement_labels(5),
            show_labels: true,
            show_icons: true,
            icon_style: IconStyle::Emoji,
            size: WidgetSize::Md,
            custom_images: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Net promoter score
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpsLabels {
    pub left: String,
    pub right: String,
}

impl Default for NpsLabels {
    fn default() -> Self {
        Self {
            left: "Not at all likely".to_string(),
            right: "Extremely likely".to_string(),
        }
    }
}

settings_enum! {
    NpsDisplayStyle (default Buttons) {
        Buttons => "buttons",
        Slider => "slider",
        Icons => "icons",
    }
}

/// 0 to 10 recommendation scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NpsSettings {
    pub labels: NpsLabels,
    pub display_style: NpsDisplayStyle,
    pub show_categories: bool,
    pub size: WidgetSize,
}

impl Default for NpsSettings {
    fn default() -> Self {
        Self {
            labels: NpsLabels::default(),
            display_style: NpsDisplayStyle::Buttons,
            show_categories: true,
            size: WidgetSize::Md,
        }
    }
}

// ---------------------------------------------------------------------------
// Star rating
// ---------------------------------------------------------------------------

settings_enum! {
    StarIcon (default Star) {
        Star => "star",
        Heart => "heart",
        Thumbsup => "thumbsup",
        Custom => "custom",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarLabel {
    pub value: u32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarImage {
    pub value: u32,
    pub active_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inactive_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StarCustomImages {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inactive_image_url: Option<String>,
    pub images: Vec<StarImage>,
}

/// Row of stars (or hearts, thumbs) with optional half steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StarRatingSettings {
    pub max_stars: u32,
    pub icon: StarIcon,
    pub allow_half: bool,
    pub size: WidgetSize,
    pub active_color: String,
    pub inactive_color: String,
    pub hover_effect: bool,
    pub show_label: bool,
    pub labels: Vec<StarLabel>,
    pub show_value: bool,
    pub orientation: Orientation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_images: Option<StarCustomImages>,
}

impl Default for StarRatingSettings {
    fn default() -> Self {
        let labels = ["Poor", "Fair", "Good", "Very Good", "Excellent"]
            .iter()
            .zip(1..)
            .map(|(label, value)| StarLabel {
                value,
                label: label.to_string(),
            })
            .collect();
        Self {
            max_stars: 5,
            icon: StarIcon::Star,
            allow_half: false,
            size: WidgetSize::Lg,
            active_color: "#fbbf24".to_string(),
            inactive_color: "#d1d5db".to_string(),
            hover_effect: true,
            show_label: true,
            labels,
            show_value: true,
            orientation: Orientation::Horizontal,
            custom_images: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Drag and drop buckets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragDropItem {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragDropBucket {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Item ids that belong in this bucket when the questionnaire is scored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_items: Option<Vec<String>>,
}

settings_enum! {
    RequiredMode (default All) {
        All => "all",
        AtLeastOne => "at-least-one",
        Custom => "custom",
    }
}

settings_enum! {
    MobileMode (default Both) {
        Drag => "drag",
        Tap => "tap",
        Both => "both",
    }
}

settings_enum! {
    BucketLayout (default Responsive) {
        Horizontal => "horizontal",
        Vertical => "vertical",
        Responsive => "responsive",
    }
}

/// Sort items into buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DragAndDropSettings {
    pub items: Vec<DragDropItem>,
    pub buckets: Vec<DragDropBucket>,
    pub allow_multiple_in_bucket: bool,
    pub allow_reorder: bool,
    pub allow_remove: bool,
    pub required_mode: RequiredMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_requirement: Option<String>,
    pub mobile_mode: MobileMode,
    pub layout: BucketLayout,
    pub partial_scoring: bool,
}

impl Default for DragAndDropSettings {
    fn default() -> Self {
        let items = (1..=3)
            .map(|n| DragDropItem {
                id: format!("item-{n}"),
                text: format!("Item {n}"),
                image_url: None,
                value: None,
            })
            .collect();
        let buckets = (1..=2)
            .map(|n| DragDropBucket {
                id: format!("bucket-{n}"),
                label: format!("Bucket {n}"),
                color: None,
                image_url: None,
                accepted_items: None,
            })
            .collect();
        Self {
            items,
            buckets,
            allow_multiple_in_bucket: false,
            allow_reorder: true,
            allow_remove: true,
            required_mode: RequiredMode::All,
            custom_requirement: None,
            mobile_mode: MobileMode::Both,
            layout: BucketLayout::Responsive,
            partial_scoring: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Script concordance Likert
// ---------------------------------------------------------------------------

settings_enum! {
    ChoiceType (default Single) {
        Single => "single",
        Multi => "multi",
    }
}

/// Scoring configuration of a script concordance question.
///
/// The option labels live on the question itself, next to this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SctLikertSettings {
    pub scale: u32,
    pub choice_type: ChoiceType,
    pub scores: Vec<i64>,
    pub show_scores: bool,
    pub normalize_multi_select: bool,
}

impl Default for SctLikertSettings {
    fn default() -> Self {
        Self::with_scale(5)
    }
}

impl SctLikertSettings {
    /// Settings for a scale of `scale` points, scored 1 through `scale`.
    pub fn with_scale(scale: u32) -> Self {
        Self {
            scale,
            choice_type: ChoiceType::Single,
            scores: (1..=i64::from(scale)).collect(),
            show_scores: true,
            normalize_multi_select: true,
        }
    }
}

/// Default agreement labels for a Likert style scale.
///
/// Scales other than 3, 7 and 9 points fall back to numbered labels, except
/// 5 which is the common five point agreement scale.
pub fn agreement_labels(scale: u32) -> Vec<String> {
    let labels: &[&str] = match scale {
        3 => &["Disagree", "Neutral", "Agree"],
        5 => &[
            "Strongly Disagree",
            "Disagree",
            "Neutral",
            "Agree",
            "Strongly Agree",
        ],
        7 => &[
            "Strongly Disagree",
            "Disagree",
            "Somewhat Disagree",
            "Neutral",
            "Somewhat Agree",
            "Agree",
            "Strongly Agree",
        ],
        9 => &[
            "Extremely Disagree",
            "Strongly Disagree",
            "Disagree",
            "Somewhat Disagree",
            "Neutral",
            "Somewhat Agree",
            "Agree",
            "Strongly Agree",
            "Extremely Agree",
        ],
        _ => return (1..=scale).map(|n| n.to_string()).collect(),
    };
    labels.iter().map(|l| l.to_string()).collect()
}
