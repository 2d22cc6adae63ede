//! Bar chart specifications rendered by the index page.
//!
//! Each chart serializes to the `{data, layout}` shape plotting front ends
//! expect:
//!
//! ```json
//! {"data": [{"type": "bar", "x": ["direct", "news"], "y": [10, 3]}],
//!  "layout": {"title": "...", "xaxis": {"title": "Genre"}, "yaxis": {"title": "Count"}}}
//! ```

use serde::{Deserialize, Serialize};

use crate::dataset::table::MessageTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarTrace {
    #[serde(rename = "type")]
    pub kind: String,
    pub x: Vec<String>,
    pub y: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axis {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub title: String,
    pub xaxis: Axis,
    pub yaxis: Axis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarChart {
    pub data: Vec<BarTrace>,
    pub layout: ChartLayout,
}

impl BarChart {
    pub fn new<T: Into<String>>(title: T, x_title: &str, x: Vec<String>, y: Vec<u64>) -> Self {
        BarChart {
            data: vec![BarTrace {
                kind: "bar".to_string(),
                x,
                y,
            }],
            layout: ChartLayout {
                title: title.into(),
                xaxis: Axis {
                    title: x_title.to_string(),
                },
                yaxis: Axis {
                    title: "Count".to_string(),
                },
            },
        }
    }
}

/// Messages per genre, genres in name order.
pub fn genre_chart(table: &MessageTable) -> BarChart {
    let (genres, counts) = table.genre_counts().into_iter().unzip();
    BarChart::new("Distribution of Message Genres", "Genre", genres, counts)
}

/// Number of messages carrying each label.
pub fn label_chart(table: &MessageTable) -> BarChart {
    let (labels, sums) = table.label_sums().into_iter().unzip();
    BarChart::new("Number of Labels of Trained Data", "Label", labels, sums)
}

/// The charts of the index page with the element ids they render into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexView {
    pub ids: Vec<String>,
    pub graphs: Vec<BarChart>,
}

impl IndexView {
    pub fn from_table(table: &MessageTable) -> Self {
        let graphs = vec![genre_chart(table), label_chart(table)];
        let ids = (0..graphs.len()).map(|i| format!("graph-{i}")).collect();
        IndexView { ids, graphs }
    }
}
