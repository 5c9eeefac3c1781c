//! 継手属性の正規化（角度・シリーズ・オス/メス・シール形状）
//!
//! 判定の優先順位:
//! 1. 明示的な角度表記（"90°", "45S"）
//! 2. キーワード（straight / gerade）
//! 3. 接続形状からの構造的推定（エルボ -> 90°、シール角のみ -> ストレート）
//! 4. 判定不能（None）

use crate::types::{Angle, ConnectionShape, Gender, SeatType, Series};
use regex::Regex;

/// 継手の角度を判定
pub fn normalize_angle(text: &str, connection: Option<ConnectionShape>) -> Option<Angle> {
    lazy_static::lazy_static! {
        static ref EXPLICIT_RE: Regex = Regex::new(r"(?i)\b(45|90)\s*(?:°|º|deg\b|grad\b|S\b)").unwrap();
        static ref STRAIGHT_RE: Regex = Regex::new(r"(?i)\b(?:straight|gerade?)\b").unwrap();
        static ref ELBOW_RE: Regex = Regex::new(r"(?i)\b(?:elbow|swept|bogen|winkel)").unwrap();
        static ref BARE_45_RE: Regex = Regex::new(r"\b45\b").unwrap();
        static ref SEAT_ANGLE_RE: Regex = Regex::new(r"\b(?:24|37|60|74)\s*°").unwrap();
    }

    if let Some(caps) = EXPLICIT_RE.captures(text) {
        return match &caps[1] {
            "45" => Some(Angle::Deg45),
            _ => Some(Angle::Deg90),
        };
    }

    if STRAIGHT_RE.is_match(text) {
        return Some(Angle::Straight);
    }

    let is_elbow = connection == Some(ConnectionShape::Elbow) || ELBOW_RE.is_match(text);
    if is_elbow {
        if BARE_45_RE.is_match(text) {
            return Some(Angle::Deg45);
        }
        return Some(Angle::Deg90);
    }

    if matches!(connection, Some(ConnectionShape::Tee) | Some(ConnectionShape::Cross)) {
        return None;
    }

    // シール角（24°/37°/60°）だけが書かれていればストレート
    if SEAT_ANGLE_RE.is_match(text) {
        return Some(Angle::Straight);
    }

    None
}

/// ISO 8434-1 のシリーズ（L/S）を判定
pub fn normalize_series(text: &str) -> Option<Series> {
    lazy_static::lazy_static! {
        static ref LIGHT_RE: Regex = Regex::new(r"(?i)\bLIGHT\s+SERIES?\b|\bLEICHTE\s+(?:REIHE|BAUREIHE)\b").unwrap();
        static ref HEAVY_RE: Regex = Regex::new(r"(?i)\bHEAVY\s+SERIES?\b|\bSCHWERE\s+(?:REIHE|BAUREIHE)\b").unwrap();
        static ref CODE_RE: Regex = Regex::new(r"(?i)\b(?:DKO|MLO|MSO|SRO|WO)([LS])(?:\b|\d)").unwrap();
    }

    if LIGHT_RE.is_match(text) {
        return Some(Series::Light);
    }
    if HEAVY_RE.is_match(text) {
        return Some(Series::Heavy);
    }

    let caps = CODE_RE.captures(text)?;
    match caps[1].to_uppercase().as_str() {
        "L" => Some(Series::Light),
        _ => Some(Series::Heavy),
    }
}

/// オス/メスを判定（接続種別の記載を優先）
pub fn normalize_gender(connection: Option<&str>, text: &str) -> Gender {
    lazy_static::lazy_static! {
        static ref CONN_FEMALE_RE: Regex = Regex::new(r"(?i)innengewinde|innenkegel|\bfemale\b").unwrap();
        static ref CONN_MALE_RE: Regex = Regex::new(r"(?i)au(?:ss|ß)engewinde|au(?:ss|ß)enkegel|\bmale\b").unwrap();
        static ref FEMALE_RE: Regex = Regex::new(r"(?i)muffe|mutter|\bfemale\b|socket|coupler").unwrap();
        static ref MALE_RE: Regex = Regex::new(r"(?i)nippel|stecker|\bmale\b|\bplug\b|\bstem\b").unwrap();
    }

    if let Some(conn) = connection {
        if CONN_FEMALE_RE.is_match(conn) {
            return Gender::Female;
        }
        if CONN_MALE_RE.is_match(conn) {
            return Gender::Male;
        }
    }

    if FEMALE_RE.is_match(text) {
        Gender::Female
    } else if MALE_RE.is_match(text) {
        Gender::Male
    } else {
        Gender::Unknown
    }
}

/// シール形状を判定
pub fn normalize_seat_type(text: &str) -> Option<SeatType> {
    lazy_static::lazy_static! {
        static ref CONE_RE: Regex = Regex::new(
            r"(?i)\b(\d{2})\s*°\s*-?\s*(?:cone|konus|kegel|dichtkegel|innenkonus|seat|flare|bördel)"
        ).unwrap();
        static ref ORING_RE: Regex = Regex::new(r"(?i)o-?ring|\bORFS\b").unwrap();
        static ref FLAT_RE: Regex = Regex::new(r"(?i)\bflat\b|flachdicht").unwrap();
        static ref SEAT_DEG_RE: Regex = Regex::new(r"\b(24|37|60|74)\s*°").unwrap();
    }

    if let Some(caps) = CONE_RE.captures(text) {
        return caps[1].parse::<u8>().ok().map(SeatType::Cone);
    }
    if ORING_RE.is_match(text) {
        return Some(SeatType::ORing);
    }
    if FLAT_RE.is_match(text) {
        return Some(SeatType::FlatFace);
    }

    let caps = SEAT_DEG_RE.captures(text)?;
    caps[1].parse::<u8>().ok().map(SeatType::Cone)
}
