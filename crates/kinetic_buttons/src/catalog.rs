//! The preset catalog: names, families and type-erased props.

use std::fmt;
use std::str::FromStr;

use kinetic::{EffectConfig, Snapshot};
use serde::{Deserialize, Serialize};

use crate::appearance::Appearance;
use crate::{
    Bouncy, Button, Confetti, Depth, Elastic, Friction, GhostTrail, HoverRipple, LavaLamp,
    LiquidFill, Magnetic, MagneticRepel, NeonGlow, Orbiting, Pixelate, Shatter,
};

/// Error returned when parsing an unknown preset name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown button `{0}` (run with --list to see the presets)")]
pub struct UnknownButton(pub String);

/// Names every preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonKind {
    Bouncy,
    Confetti,
    Friction,
    Depth,
    Elastic,
    GhostTrail,
    HoverRipple,
    LavaLamp,
    LiquidFill,
    Magnetic,
    MagneticRepel,
    NeonGlow,
    Orbiting,
    Pixelate,
    Shatter,
}

impl ButtonKind {
    /// Every preset, in catalog order.
    pub const ALL: [Self; 15] = [
        Self::Bouncy,
        Self::Confetti,
        Self::Friction,
        Self::Depth,
        Self::Elastic,
        Self::GhostTrail,
        Self::HoverRipple,
        Self::LavaLamp,
        Self::LiquidFill,
        Self::Magnetic,
        Self::MagneticRepel,
        Self::NeonGlow,
        Self::Orbiting,
        Self::Pixelate,
        Self::Shatter,
    ];

    /// Snake-case name, as used in props documents and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bouncy => "bouncy",
            Self::Confetti => "confetti",
            Self::Friction => "friction",
            Self::Depth => "depth",
            Self::Elastic => "elastic",
            Self::GhostTrail => "ghost_trail",
            Self::HoverRipple => "hover_ripple",
            Self::LavaLamp => "lava_lamp",
            Self::LiquidFill => "liquid_fill",
            Self::Magnetic => "magnetic",
            Self::MagneticRepel => "magnetic_repel",
            Self::NeonGlow => "neon_glow",
            Self::Orbiting => "orbiting",
            Self::Pixelate => "pixelate",
            Self::Shatter => "shatter",
        }
    }

    /// One-line description for listings.
    pub const fn summary(self) -> &'static str {
        match self {
            Self::Bouncy => "hops a few times when pressed",
            Self::Confetti => "bursts into falling confetti when pressed",
            Self::Friction => "drags with friction and springs home",
            Self::Depth => "rises and tilts toward the pointer",
            Self::Elastic => "stretches elastically while hovered",
            Self::GhostTrail => "leaves fading marks behind the pointer",
            Self::HoverRipple => "sends rings out from the pointer",
            Self::LavaLamp => "blobs drift and shift hue inside",
            Self::LiquidFill => "floods with color while hovered",
            Self::Magnetic => "leans toward a nearby pointer",
            Self::MagneticRepel => "shies away from the pointer",
            Self::NeonGlow => "lights up with a neon glow while hovered",
            Self::Orbiting => "shapes circle it; presses play a flourish",
            Self::Pixelate => "dissolves into pixels and reforms",
            Self::Shatter => "breaks into shards and reforms",
        }
    }

    /// Props with every default.
    pub fn default_props(self) -> AnyButton {
        match self {
            Self::Bouncy => AnyButton::Bouncy(Bouncy::default()),
            Self::Confetti => AnyButton::Confetti(Confetti::default()),
            Self::Friction => AnyButton::Friction(Friction::default()),
            Self::Depth => AnyButton::Depth(Depth::default()),
            Self::Elastic => AnyButton::Elastic(Elastic::default()),
            Self::GhostTrail => AnyButton::GhostTrail(GhostTrail::default()),
            Self::HoverRipple => AnyButton::HoverRipple(HoverRipple::default()),
            Self::LavaLamp => AnyButton::LavaLamp(LavaLamp::default()),
            Self::LiquidFill => AnyButton::LiquidFill(LiquidFill::default()),
            Self::Magnetic => AnyButton::Magnetic(Magnetic::default()),
            Self::MagneticRepel => AnyButton::MagneticRepel(MagneticRepel::default()),
            Self::NeonGlow => AnyButton::NeonGlow(NeonGlow::default()),
            Self::Orbiting => AnyButton::Orbiting(Orbiting::default()),
            Self::Pixelate => AnyButton::Pixelate(Pixelate::default()),
            Self::Shatter => AnyButton::Shatter(Shatter::default()),
        }
    }
}

impl fmt::Display for ButtonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ButtonKind {
    type Err = UnknownButton;

    /// Accepts snake-case and kebab-case names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_").to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| UnknownButton(s.to_string()))
    }
}

/// Props of any preset, tagged by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "button", rename_all = "snake_case")]
pub enum AnyButton {
    Bouncy(Bouncy),
    Confetti(Confetti),
    Friction(Friction),
    Depth(Depth),
    Elastic(Elastic),
    GhostTrail(GhostTrail),
    HoverRipple(HoverRipple),
    LavaLamp(LavaLamp),
    LiquidFill(LiquidFill),
    Magnetic(Magnetic),
    MagneticRepel(MagneticRepel),
    NeonGlow(NeonGlow),
    Orbiting(Orbiting),
    Pixelate(Pixelate),
    Shatter(Shatter),
}

macro_rules! dispatch {
    ($self:expr, $button:ident => $body:expr) => {
        match $self {
            AnyButton::Bouncy($button) => $body,
            AnyButton::Confetti($button) => $body,
            AnyButton::Friction($button) => $body,
            AnyButton::Depth($button) => $body,
            AnyButton::Elastic($button) => $body,
            AnyButton::GhostTrail($button) => $body,
            AnyButton::HoverRipple($button) => $body,
            AnyButton::LavaLamp($button) => $body,
            AnyButton::LiquidFill($button) => $body,
            AnyButton::Magnetic($button) => $body,
            AnyButton::MagneticRepel($button) => $body,
            AnyButton::NeonGlow($button) => $body,
            AnyButton::Orbiting($button) => $body,
            AnyButton::Pixelate($button) => $body,
            AnyButton::Shatter($button) => $body,
        }
    };
}

fn kind_of<B: Button>(_: &B) -> ButtonKind {
    B::KIND
}

impl AnyButton {
    /// Which preset these props belong to.
    pub fn kind(&self) -> ButtonKind {
        dispatch!(self, button => kind_of(button))
    }

    /// Engine configuration for these props.
    pub fn config(&self) -> EffectConfig {
        dispatch!(self, button => button.config())
    }

    /// Visual state for one published frame.
    pub fn appearance(&self, frame: &Snapshot) -> Appearance {
        dispatch!(self, button => button.appearance(frame))
    }
}

impl From<ButtonKind> for AnyButton {
    fn from(kind: ButtonKind) -> Self {
        kind.default_props()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back() {
        for kind in ButtonKind::ALL {
            assert_eq!(kind.name().parse::<ButtonKind>(), Ok(kind));
            assert_eq!(kind.default_props().kind(), kind);
        }
        assert_eq!("Neon-Glow".parse::<ButtonKind>(), Ok(ButtonKind::NeonGlow));
    }

    #[test]
    fn unknown_names_are_reported() {
        let err = "sparkle".parse::<ButtonKind>().unwrap_err();
        assert_eq!(err, UnknownButton("sparkle".to_string()));
        assert!(err.to_string().contains("sparkle"));
    }

    #[test]
    fn serde_names_match_kind_names() {
        for kind in ButtonKind::ALL {
            let json = serde_json::to_value(kind.default_props()).unwrap();
            assert_eq!(json["button"], kind.name());
        }
    }
}
