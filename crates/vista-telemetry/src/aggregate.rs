use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::model::SensorReading;
use crate::window::SensorWindow;

/// 时间桶标签格式：秒级展示精度的本地时刻
const BUCKET_TIME_FORMAT: &str = "%H:%M:%S";

/// 最新值快照行
#[derive(Debug, Clone, Serialize)]
pub struct LatestValue {
    pub series: String,
    pub device_id: String,
    pub sensor_type: String,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

/// 时间桶行
///
/// 桶内是序列键到该桶内数值的映射；同桶同序列后到覆盖先到，不做平均。
#[derive(Debug, Clone, Serialize)]
pub struct TimeBucket {
    pub time: String,
    pub values: HashMap<String, f64>,
}

/// 序列统计行
#[derive(Debug, Clone, Serialize)]
pub struct SeriesStats {
    pub series: String,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub count: usize,
}

/// 最新值快照
///
/// 每个序列键取时间戳最大的读数；时间戳相同时序列顺序靠后者胜出。
/// 行顺序为序列在窗口中的首次出现顺序。
pub fn latest_values(window: &SensorWindow) -> Vec<LatestValue> {
    let mut order: Vec<String> = Vec::new();
    let mut latest: HashMap<String, &SensorReading> = HashMap::new();

    for reading in window.iter() {
        match latest.entry(reading.series_key()) {
            Entry::Occupied(mut entry) => {
                if reading.timestamp >= entry.get().timestamp {
                    entry.insert(reading);
                }
            }
            Entry::Vacant(entry) => {
                order.push(entry.key().clone());
                entry.insert(reading);
            }
        }
    }

    order
        .into_iter()
        .filter_map(|series| {
            latest.get(&series).map(|reading| LatestValue {
                series: series.clone(),
                device_id: reading.device_id.clone(),
                sensor_type: reading.sensor_type.clone(),
                value: reading.value,
                timestamp: reading.timestamp,
            })
        })
        .collect()
}

/// 时间桶表
///
/// 按秒级本地时刻标签分组，桶顺序为首次出现顺序。
pub fn time_buckets(window: &SensorWindow) -> Vec<TimeBucket> {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, HashMap<String, f64>> = HashMap::new();

    for reading in window.iter() {
        let label = reading
            .timestamp
            .with_timezone(&Local)
            .format(BUCKET_TIME_FORMAT)
            .to_string();

        let bucket = match buckets.entry(label) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                order.push(entry.key().clone());
                entry.insert(HashMap::new())
            }
        };
        bucket.insert(reading.series_key(), reading.value);
    }

    order
        .into_iter()
        .filter_map(|time| buckets.remove(&time).map(|values| TimeBucket { time, values }))
        .collect()
}

/// 序列统计
///
/// 只为窗口中至少有一条读数的序列计算，均值不会除零。
pub fn series_statistics(window: &SensorWindow) -> Vec<SeriesStats> {
    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, Vec<f64>> = HashMap::new();

    for reading in window.iter() {
        match grouped.entry(reading.series_key()) {
            Entry::Occupied(entry) => entry.into_mut().push(reading.value),
            Entry::Vacant(entry) => {
                order.push(entry.key().clone());
                entry.insert(vec![reading.value]);
            }
        }
    }

    order
        .into_iter()
        .filter_map(|series| {
            grouped.remove(&series).map(|values| {
                let count = values.len();
                let mut min = f64::INFINITY;
                let mut max = f64::NEG_INFINITY;
                let mut sum = 0.0;
                for value in &values {
                    min = min.min(*value);
                    max = max.max(*value);
                    sum += value;
                }

                SeriesStats {
                    series,
                    min,
                    max,
                    avg: sum / count as f64,
                    count,
                }
            })
        })
        .collect()
}
