//! 科目课时长度与价格表的解析
//!
//! 文本形式按逗号拆分，无法解析的片段直接丢弃；数组 / 对象形式中出现非正数则报错。

use std::collections::BTreeMap;

use crate::errors::{Result, TutorHubError};
use crate::models::subjects::requests::{DurationsInput, PricesInput};

fn positive_minutes(value: i64) -> Option<i32> {
    i32::try_from(value).ok().filter(|v| *v > 0)
}

pub fn parse_durations(input: Option<DurationsInput>) -> Result<Vec<i32>> {
    match input {
        None => Ok(Vec::new()),
        Some(DurationsInput::List(values)) => values
            .into_iter()
            .map(|v| {
                positive_minutes(v).ok_or_else(|| {
                    TutorHubError::validation(format!("Duration must be a positive integer: {v}"))
                })
            })
            .collect(),
        Some(DurationsInput::Text(text)) => Ok(text
            .split(',')
            .filter_map(|token| token.trim().parse::<i64>().ok())
            .filter_map(positive_minutes)
            .collect()),
    }
}

fn parse_price_token(token: &str) -> Option<(String, f64)> {
    let (key, value) = token.split_once(':')?;
    let key = key.trim().trim_matches('"').trim();
    if key.is_empty() {
        return None;
    }
    let value = value.trim().trim_matches('"').trim().parse::<f64>().ok()?;
    (value.is_finite() && value > 0.0).then(|| (key.to_string(), value))
}

pub fn parse_prices(input: Option<PricesInput>) -> Result<BTreeMap<String, f64>> {
    match input {
        None => Ok(BTreeMap::new()),
        Some(PricesInput::Map(map)) => {
            let mut prices = BTreeMap::new();
            for (key, value) in map {
                let key = key.trim().to_string();
                if key.is_empty() {
                    return Err(TutorHubError::validation("Price label must not be empty"));
                }
                if !(value.is_finite() && value > 0.0) {
                    return Err(TutorHubError::validation(format!(
                        "Price for '{key}' must be a positive number"
                    )));
                }
                prices.insert(key, value);
            }
            Ok(prices)
        }
        Some(PricesInput::Text(text)) => {
            let text = text.trim();
            let text = text
                .strip_prefix('{')
                .and_then(|t| t.strip_suffix('}'))
                .unwrap_or(text);
            Ok(text.split(',').filter_map(parse_price_token).collect())
        }
    }
}
