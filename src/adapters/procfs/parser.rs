use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Missing field: {0}")]
    MissingField(String),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// CPU stats from /proc/stat
#[derive(Debug, Clone, Default)]
pub struct CpuStat {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuStat {
    pub fn total(&self) -> u64 {
        self.user + self.nice + self.system + self.idle + self.iowait + self.irq + self.softirq + self.steal
    }

    pub fn idle_total(&self) -> u64 {
        self.idle + self.iowait
    }

    pub fn busy(&self) -> u64 {
        self.total() - self.idle_total()
    }
}

/// Parse /proc/stat (first line only for aggregate CPU)
pub fn parse_cpu_stat(content: &str) -> ParseResult<CpuStat> {
    let first_line = content
        .lines()
        .next()
        .ok_or_else(|| ParseError::Parse("Empty stat file".to_string()))?;

    if !first_line.starts_with("cpu ") {
        return Err(ParseError::Parse("Missing cpu line".to_string()));
    }

    let parts: Vec<&str> = first_line.split_whitespace().skip(1).collect();
    // Kernels before 2.6.11 stop at softirq; steal is then zero
    if parts.len() < 7 {
        return Err(ParseError::Parse("Incomplete cpu stat".to_string()));
    }

    let field = |idx: usize, name: &str| -> ParseResult<u64> {
        match parts.get(idx) {
            Some(raw) => raw.parse().map_err(|e| ParseError::Parse(format!("{}: {}", name, e))),
            None => Ok(0),
        }
    };

    Ok(CpuStat {
        user: field(0, "user")?,
        nice: field(1, "nice")?,
        system: field(2, "system")?,
        idle: field(3, "idle")?,
        iowait: field(4, "iowait")?,
        irq: field(5, "irq")?,
        softirq: field(6, "softirq")?,
        steal: field(7, "steal")?,
    })
}

/// Parse /proc/meminfo into a map
pub fn parse_meminfo(content: &str) -> ParseResult<HashMap<String, u64>> {
    let mut map = HashMap::new();

    for line in content.lines() {
        let parts: Vec<&str> = line.split(':').collect();
        if parts.len() != 2 {
            continue;
        }

        let key = parts[0].trim().to_string();
        let value_str = parts[1].trim().trim_end_matches(" kB");

        if let Ok(value) = value_str.parse::<u64>() {
            let bytes = value
                .checked_mul(1024)
                .ok_or_else(|| ParseError::Parse(format!("{} out of range: {} kB", key, value)))?;
            map.insert(key, bytes);
        }
    }

    if map.is_empty() {
        return Err(ParseError::Parse("No meminfo entries".to_string()));
    }

    Ok(map)
}

/// Total and available memory in bytes.
///
/// Falls back to free + buffers + cached on kernels without MemAvailable.
pub fn memory_totals(meminfo: &HashMap<String, u64>) -> ParseResult<(u64, u64)> {
    let total = *meminfo
        .get("MemTotal")
        .ok_or_else(|| ParseError::MissingField("MemTotal".to_string()))?;
    if total == 0 {
        return Err(ParseError::Parse("MemTotal is zero".to_string()));
    }

    let available = match meminfo.get("MemAvailable") {
        Some(available) => *available,
        None => {
            let free = *meminfo
                .get("MemFree")
                .ok_or_else(|| ParseError::MissingField("MemAvailable".to_string()))?;
            free.saturating_add(meminfo.get("Buffers").copied().unwrap_or(0))
                .saturating_add(meminfo.get("Cached").copied().unwrap_or(0))
        }
    };

    Ok((total, available.min(total)))
}
