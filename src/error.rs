use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error(
        "data is not sorted on the x accessor: item {index} precedes its predecessor, \
         provide data sorted in ascending order"
    )]
    UnsortedData { index: usize },

    #[error("x scale does not support invert (likely ordinal), {operation} is not available")]
    NonInvertibleScale { operation: &'static str },

    #[error("sub-chart {chart_id} declares neither y extents nor an extents calculator")]
    MissingYExtents { chart_id: u32 },

    #[error("showing {len} datapoints, consider adjusting the x extents")]
    DegenerateWindow { len: usize },

    #[error("unknown sub-chart id {0}")]
    UnknownSubChart(u32),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
