//! SVG geometry of the robot head.
//!
//! The head lives in a 16×16 view box. While speaking, the mouth arc gets
//! deeper and the bottom row of teeth drops in proportion to the mouth
//! intensity.

use mouth::MouthState;
use std::fmt::Write;
use std::time::Duration;

pub const CLOSED_MOUTH: &str = "M 4,10 A 3,2 0 0 0 12,10 L 4,10";
/// How far the bottom teeth drop at full intensity.
pub const SPEAKING_OFFSET: f32 = 0.9;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tooth {
    pub x: f32,
    pub top_y: f32,
    pub top_y_end: f32,
    pub bottom_y: f32,
    pub bottom_y_end: f32,
}

const fn tooth(x: f32, top_y_end: f32, bottom_y: f32, bottom_y_end: f32) -> Tooth {
    Tooth {
        x,
        top_y: 10.3,
        top_y_end,
        bottom_y,
        bottom_y_end,
    }
}

pub const TEETH: [Tooth; 6] = [
    tooth(5.1, 10.8, 11.1, 11.9),
    tooth(6.2, 11.0, 11.3, 12.5),
    tooth(7.4, 11.2, 11.5, 12.7),
    tooth(8.6, 11.2, 11.5, 12.7),
    tooth(9.8, 11.0, 11.3, 12.7),
    tooth(10.9, 10.8, 11.1, 12.1),
];

/// A vertical line segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub x: f32,
    pub y1: f32,
    pub y2: f32,
}

fn clamped(state: &MouthState) -> f32 {
    if state.is_animating {
        state.intensity.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Path of the mouth opening for `state`.
pub fn mouth_path(state: &MouthState) -> String {
    if !state.is_animating {
        return CLOSED_MOUTH.to_string();
    }
    let radius_y = 2.0 + clamped(state);
    format!("M 4,10 A 3,{radius_y} 0 0 0 12,10 L 4,10")
}

/// Vertical displacement of the bottom teeth.
pub fn bottom_offset(state: &MouthState) -> f32 {
    SPEAKING_OFFSET * clamped(state)
}

/// Top and bottom line of every tooth.
pub fn teeth(state: &MouthState) -> Vec<(Line, Line)> {
    let drop = bottom_offset(state);
    TEETH
        .iter()
        .map(|t| {
            (
                Line {
                    x: t.x,
                    y1: t.top_y,
                    y2: t.top_y_end,
                },
                Line {
                    x: t.x,
                    y1: t.bottom_y + drop,
                    y2: t.bottom_y_end + drop,
                },
            )
        })
        .collect()
}

/// Period of the open/close wobble; quicker while stepping syllables.
pub fn wobble_period(state: &MouthState) -> Duration {
    if state.current_syllable > 0 {
        Duration::from_millis(150)
    } else {
        Duration::from_millis(200)
    }
}

/// Render the whole head as a standalone SVG document.
pub fn render_svg(state: &MouthState) -> String {
    let mut svg = String::new();
    let class = if state.is_animating { "head speaking" } else { "head" };
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="{class}" viewBox="0 0 16 16">"#
    );
    svg.push_str(concat!(
        r#"<circle class="face" cx="8" cy="8" r="7"/>"#,
        r#"<ellipse class="eye" cx="5" cy="6.5" rx="1.5" ry="2.5"/>"#,
        r#"<ellipse class="pupil" cx="5" cy="7.5" rx="0.375" ry="0.625"/>"#,
        r#"<ellipse class="eye" cx="11" cy="6.5" rx="1.5" ry="2.5"/>"#,
        r#"<ellipse class="pupil" cx="11" cy="7.5" rx="0.375" ry="0.625"/>"#,
        "\n",
    ));
    let path = mouth_path(state);
    let _ = writeln!(svg, r#"<path class="mouth" d="{path}"/>"#);
    for (top, bottom) in teeth(state) {
        for line in [top, bottom] {
            let _ = writeln!(
                svg,
                r#"<line class="tooth" x1="{x}" y1="{y1}" x2="{x}" y2="{y2}"/>"#,
                x = line.x,
                y1 = line.y1,
                y2 = line.y2,
            );
        }
    }
    let _ = writeln!(svg, r#"<path class="lips" d="{path}"/>"#);
    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speaking(intensity: f32, syllable: u32) -> MouthState {
        MouthState {
            is_animating: true,
            intensity,
            current_word: "hi".into(),
            current_syllable: syllable,
        }
    }

    #[test]
    fn idle_mouth_is_closed() {
        assert_eq!(mouth_path(&MouthState::idle()), CLOSED_MOUTH);
        assert_eq!(bottom_offset(&MouthState::idle()), 0.0);
    }

    #[test]
    fn intensity_deepens_mouth() {
        assert_eq!(mouth_path(&speaking(1.0, 0)), "M 4,10 A 3,3 0 0 0 12,10 L 4,10");
        assert_eq!(mouth_path(&speaking(0.5, 0)), "M 4,10 A 3,2.5 0 0 0 12,10 L 4,10");
        assert_eq!(mouth_path(&speaking(7.0, 0)), "M 4,10 A 3,3 0 0 0 12,10 L 4,10");
    }

    #[test]
    fn bottom_teeth_drop_while_speaking() {
        let still = teeth(&MouthState::idle());
        let open = teeth(&speaking(1.0, 1));
        for ((top_a, bottom_a), (top_b, bottom_b)) in still.iter().zip(&open) {
            assert_eq!(top_a, top_b);
            assert!((bottom_b.y1 - bottom_a.y1 - SPEAKING_OFFSET).abs() < 1e-5);
        }
    }

    #[test]
    fn syllables_wobble_faster() {
        assert!(wobble_period(&speaking(0.5, 2)) < wobble_period(&speaking(0.5, 0)));
    }

    #[test]
    fn svg_contains_face_parts() {
        let svg = render_svg(&speaking(0.5, 1));
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("head speaking"));
        assert_eq!(svg.matches("class=\"tooth\"").count(), 12);
        assert!(svg.contains("A 3,2.5"));
    }
}
