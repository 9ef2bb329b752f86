// src/job_insights.rs
//! Client-side job badges: a stable popularity score plus simple predicates
//! used to tag listings.

use crate::types::Job;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use uuid::{Uuid, Variant};

const FNV_OFFSET: f64 = 2_166_136_261.0;
const FNV_PRIME: f64 = 16_777_619.0;

pub const HOT_THRESHOLD: f64 = 80.0;
pub const RECOMMENDED_THRESHOLD: f64 = 75.0;
pub const RECOMMENDED_SALARY: f64 = 150_000.0;
pub const NEW_JOB_DAYS: f64 = 7.0;

const MAX_SCORE: f64 = 0.97;
const SALARY_BOOST_CAP: f64 = 0.3;
const SALARY_BOOST_SCALE: f64 = 200_000.0;

/// Two's complement truncation to 32 bits of an integral double.
fn to_int32(h: f64) -> i32 {
    (h as i64) as i32
}

/// Deterministic 0..1 value derived from `key`: an FNV-style hash over UTF-16
/// code units. The xor works on 32 bits, the product stays a double.
fn seeded(key: &str) -> f64 {
    let h = key.encode_utf16().fold(FNV_OFFSET, |h, unit| {
        f64::from(to_int32(h) ^ i32::from(unit)) * FNV_PRIME
    });
    // |h| < 2^56, so the i64 cast is exact before wrapping to u32.
    f64::from(((h as i64) as u32) % 1000) / 1000.0
}

fn positive_salary_max(job: &Job) -> f64 {
    job.salary_max.filter(|max| *max > 0.0).unwrap_or(0.0)
}

/// Stable popularity in 45..=97, boosted by salary.
pub fn popularity_score(job: &Job) -> f64 {
    let base = seeded(&job.id) * 0.5 + 0.45;
    let salary = positive_salary_max(job);
    let boost = if salary > 0.0 {
        (salary / SALARY_BOOST_SCALE).min(SALARY_BOOST_CAP)
    } else {
        0.0
    };
    (base + boost).min(MAX_SCORE) * 100.0
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // Timestamps without an offset are UTC.
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

pub fn is_new_at(job: &Job, now: DateTime<Utc>) -> bool {
    let Some(created) = job.created_at.as_deref().and_then(parse_timestamp) else {
        return false;
    };
    let days = (now - created).num_milliseconds() as f64 / 86_400_000.0;
    days <= NEW_JOB_DAYS
}

pub fn is_new(job: &Job) -> bool {
    is_new_at(job, Utc::now())
}

pub fn is_hot(job: &Job) -> bool {
    popularity_score(job) >= HOT_THRESHOLD
}

pub fn is_recommended(job: &Job) -> bool {
    popularity_score(job) >= RECOMMENDED_THRESHOLD
        || job.salary_max.unwrap_or(0.0) >= RECOMMENDED_SALARY
}

pub fn is_remote(job: &Job) -> bool {
    job.location.to_lowercase().contains("remote")
}

/// Human readable salary range. Zero counts as unset.
pub fn format_salary(min: Option<f64>, max: Option<f64>) -> String {
    let min = min.filter(|v| *v != 0.0);
    let max = max.filter(|v| *v != 0.0);
    match (min, max) {
        (Some(min), Some(max)) => format!("{} - {}", min, max),
        (Some(min), None) => format!("{}+", min),
        (None, Some(max)) => format!("Up to {}", max),
        (None, None) => "\u{2014}".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagColor {
    Success,
    Error,
    Primary,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobTag {
    pub key: &'static str,
    pub label: &'static str,
    pub color: TagColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<&'static str>,
}

impl JobTag {
    const fn new(key: &'static str, label: &'static str, color: TagColor) -> Self {
        Self {
            key,
            label,
            color,
            variant: None,
        }
    }
}

/// Badges in display order: recommended, hot, new, remote.
pub fn job_tags(job: &Job) -> Vec<JobTag> {
    job_tags_at(job, Utc::now())
}

pub fn job_tags_at(job: &Job, now: DateTime<Utc>) -> Vec<JobTag> {
    let mut tags = Vec::new();
    if is_recommended(job) {
        tags.push(JobTag::new("recommended", "Recommended", TagColor::Success));
    }
    if is_hot(job) {
        tags.push(JobTag::new("hot", "Hot", TagColor::Error));
    }
    if is_new_at(job, now) {
        tags.push(JobTag::new("new", "New", TagColor::Primary));
    }
    if is_remote(job) {
        tags.push(JobTag {
            variant: Some("outlined"),
            ..JobTag::new("remote", "Remote", TagColor::Default)
        });
    }
    tags
}

/// Hyphenated RFC 4122 UUID of version 1 through 5.
pub fn is_guid(s: &str) -> bool {
    if s.len() != 36 {
        return false;
    }
    match Uuid::parse_str(s) {
        Ok(id) => {
            matches!(id.get_version_num(), 1..=5) && id.get_variant() == Variant::RFC4122
        }
        Err(_) => false,
    }
}

/// Number of skills in `a` that also appear in `b`, ignoring case.
pub fn overlap_score<A, B>(a: &[A], b: &[B]) -> usize
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let known: HashSet<String> = b.iter().map(|s| s.as_ref().to_lowercase()).collect();
    a.iter()
        .filter(|s| known.contains(&s.as_ref().to_lowercase()))
        .count()
}
