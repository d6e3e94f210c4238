// ==========================================
// CycleWeave LCA - 时钟抽象
// ==========================================
// 护照编号与溯源时间线依赖"当前时间", 由调用方注入
// ==========================================

use chrono::{NaiveDateTime, Utc};

pub trait Clock: Send + Sync {
    /// 当前时间 (UTC, 无时区)
    fn now(&self) -> NaiveDateTime;
}

/// 系统时钟
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

/// 固定时钟 (测试用)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
