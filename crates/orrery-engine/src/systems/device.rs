//! Device classification from viewport width and user agent.
//!
//! Pure functions. The web bridge re-evaluates through [`DeviceWatch`] on
//! every resize; the scene keeps the `RenderDefaults` it was built with.

use crate::systems::quality::QualityProfile;

/// Viewports narrower than this are treated as constrained.
pub const MOBILE_BREAKPOINT: f32 = 768.0;

/// Case-insensitive user-agent fragments that mark a mobile device.
const MOBILE_TOKENS: [&str; 9] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
    "mobile",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

/// True if the user agent looks mobile or the viewport is narrow.
pub fn is_constrained(width: f32, user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    width < MOBILE_BREAKPOINT || MOBILE_TOKENS.iter().any(|t| ua.contains(t))
}

impl DeviceClass {
    pub fn detect(width: f32, user_agent: &str) -> Self {
        if is_constrained(width, user_agent) {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn defaults(self) -> RenderDefaults {
        match self {
            DeviceClass::Desktop => RenderDefaults {
                star_count: 5000,
                dust_count: 1500,
                sphere_segments: 64,
                quality: QualityProfile::High,
                antialias: true,
            },
            DeviceClass::Mobile => RenderDefaults {
                star_count: 2000,
                dust_count: 600,
                sphere_segments: 32,
                quality: QualityProfile::Medium,
                antialias: false,
            },
        }
    }
}

/// Tracks the device class across resizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceWatch {
    class: DeviceClass,
}

impl DeviceWatch {
    pub fn new(class: DeviceClass) -> Self {
        Self { class }
    }

    pub fn class(&self) -> DeviceClass {
        self.class
    }

    /// Re-classify; returns the new class only when it changed.
    pub fn observe(&mut self, width: f32, user_agent: &str) -> Option<DeviceClass> {
        let class = DeviceClass::detect(width, user_agent);
        if class == self.class {
            return None;
        }
        log::info!("device class {:?} -> {:?}", self.class, class);
        self.class = class;
        Some(class)
    }
}

/// Scene-building parameters chosen once per device class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderDefaults {
    pub star_count: usize,
    pub dust_count: usize,
    /// Width segments for procedural spheres; height uses half.
    pub sphere_segments: u32,
    pub quality: QualityProfile,
    pub antialias: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESKTOP_UA: &str =
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36";

    #[test]
    fn wide_desktop_is_unconstrained() {
        assert!(!is_constrained(1920.0, DESKTOP_UA));
        assert_eq!(DeviceClass::detect(1920.0, DESKTOP_UA), DeviceClass::Desktop);
    }

    #[test]
    fn narrow_viewport_is_constrained() {
        assert!(is_constrained(767.0, DESKTOP_UA));
        assert!(!is_constrained(768.0, DESKTOP_UA));
    }

    #[test]
    fn mobile_tokens_match_case_insensitively() {
        for ua in [
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)",
            "Mozilla/5.0 (Linux; ANDROID 14)",
            "Opera/9.80 (J2ME/MIDP; Opera Mini/9.80)",
            "Mozilla/5.0 (compatible; MSIE 10.0; Windows Phone 8.0; IEMobile/10.0)",
            "something Mobile Safari",
        ] {
            assert!(is_constrained(1920.0, ua), "{ua}");
        }
    }

    #[test]
    fn defaults_per_class() {
        let d = DeviceClass::Desktop.defaults();
        assert_eq!((d.star_count, d.dust_count, d.sphere_segments), (5000, 1500, 64));
        assert_eq!(d.quality, QualityProfile::High);
        let m = DeviceClass::Mobile.defaults();
        assert_eq!((m.star_count, m.dust_count, m.sphere_segments), (2000, 600, 32));
        assert_eq!(m.quality, QualityProfile::Medium);
        assert!(!m.antialias);
    }

    #[test]
    fn watch_reports_only_class_changes() {
        let mut watch = DeviceWatch::new(DeviceClass::Desktop);
        assert_eq!(watch.observe(1440.0, DESKTOP_UA), None);
        assert_eq!(watch.observe(600.0, DESKTOP_UA), Some(DeviceClass::Mobile));
        assert_eq!(watch.observe(500.0, DESKTOP_UA), None);
        assert_eq!(watch.observe(1024.0, DESKTOP_UA), Some(DeviceClass::Desktop));
        assert_eq!(watch.class(), DeviceClass::Desktop);
    }
}
