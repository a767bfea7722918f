use std::collections::VecDeque;

use crate::model::SensorReading;

/// 窗口容量：保留最近 N 条读数
///
/// 限定内存与实时图表的渲染成本，用长历史换响应速度。
pub const WINDOW_CAPACITY: usize = 50;

/// 传感器读数窗口
///
/// 有界 FIFO：尾部追加，溢出时无条件从头部逐出，不区分序列。
/// 高频序列可能把低频序列挤出窗口，这是已知限制，不做补偿。
#[derive(Debug)]
pub struct SensorWindow {
    readings: VecDeque<SensorReading>,
    capacity: usize,
}

impl Default for SensorWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorWindow {
    pub fn new() -> Self {
        Self {
            readings: VecDeque::with_capacity(WINDOW_CAPACITY + 1),
            capacity: WINDOW_CAPACITY,
        }
    }

    /// 尾部追加，超出容量时从头部逐出
    pub fn append(&mut self, reading: SensorReading) {
        self.readings.push_back(reading);
        while self.readings.len() > self.capacity {
            self.readings.pop_front();
        }
    }

    /// 读数序列，最旧在前
    pub fn iter(&self) -> impl Iterator<Item = &SensorReading> {
        self.readings.iter()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn reading(n: i64) -> SensorReading {
        SensorReading {
            timestamp: Utc::now() + Duration::milliseconds(n),
            device_id: "dev1".to_string(),
            sensor_type: "temperature".to_string(),
            value: n as f64,
        }
    }

    #[test]
    fn test_append_below_capacity() {
        let mut window = SensorWindow::new();
        for n in 0..10 {
            window.append(reading(n));
        }

        assert_eq!(window.len(), 10);
        let values: Vec<f64> = window.iter().map(|r| r.value).collect();
        assert_eq!(values, (0..10).map(|n| n as f64).collect::<Vec<_>>());
    }

    #[test]
    fn test_overflow_evicts_oldest_first() {
        let mut window = SensorWindow::new();

        // 51 条递增读数：第 1 条被逐出，剩下 #2–#51
        for n in 1..=(WINDOW_CAPACITY as i64 + 1) {
            window.append(reading(n));
        }

        assert_eq!(window.len(), WINDOW_CAPACITY);
        assert_eq!(window.iter().next().unwrap().value, 2.0);
        assert_eq!(window.iter().last().unwrap().value, 51.0);
    }

    #[test]
    fn test_window_keeps_last_n_in_order() {
        let mut window = SensorWindow::new();
        let total = WINDOW_CAPACITY as i64 + 17;

        for n in 0..total {
            window.append(reading(n));
        }

        assert_eq!(window.len(), WINDOW_CAPACITY);
        let values: Vec<f64> = window.iter().map(|r| r.value).collect();
        let expected: Vec<f64> = ((total - WINDOW_CAPACITY as i64)..total)
            .map(|n| n as f64)
            .collect();
        assert_eq!(values, expected);
    }
}
