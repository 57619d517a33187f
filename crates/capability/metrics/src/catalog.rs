//! 固定的指标目录。
//!
//! 每个设备导出 6 个测量值与 6 个状态标志，均为 gauge，标签为
//! `{id, name, sud_type}`。目录在编译期确定，运行期只读。

use domain::Reading;

/// 每个样本携带的标签名（按字典序，与导出顺序一致）。
pub const READING_LABELS: [&str; 3] = ["id", "name", "sud_type"];

/// 单个指标的描述：名称、帮助文本、取值函数。
#[derive(Debug, Clone, Copy)]
pub struct MetricSpec {
    pub name: &'static str,
    pub help: &'static str,
    pub value: fn(&Reading) -> f64,
}

pub static READING_METRICS: [MetricSpec; 12] = [
    MetricSpec {
        name: "temperature_celsius",
        help: "Water temperature in celsius",
        value: |r| r.sud.data.temperature,
    },
    MetricSpec {
        name: "ph",
        help: "Water pH",
        value: |r| r.sud.data.ph,
    },
    MetricSpec {
        name: "ammonia",
        help: "PPM Water NH3 free ammonia",
        value: |r| r.sud.data.nh3,
    },
    MetricSpec {
        name: "light_kelvin",
        help: "Correlated Color Temperature of the light in degrees Kelvin.",
        value: |r| r.sud.data.kelvin,
    },
    MetricSpec {
        name: "light_lux",
        help: "Intensity of the light observed in the tank in lux.",
        value: |r| r.sud.data.lux,
    },
    MetricSpec {
        name: "light_par",
        help: "Photosynthetic active radiation, the light power between 400nm and 700nm.",
        value: |r| r.sud.data.par,
    },
    MetricSpec {
        name: "seneye_status_water",
        help: "Water is 1 if the SUD is submerged in water, 0 otherwise.",
        value: |r| r.sud.data.status.water as f64,
    },
    MetricSpec {
        name: "seneye_status_temperature",
        help: "Temperature is 0 if the temperature is within limits, 1 otherwise.",
        value: |r| r.sud.data.status.temperature as f64,
    },
    MetricSpec {
        name: "seneye_status_ph",
        help: "PH is 0 if the pH is within limits, 1 otherwise.",
        value: |r| r.sud.data.status.ph as f64,
    },
    MetricSpec {
        name: "seneye_status_ammonia",
        help: "Ammonia (NH3) is 0 if the free ammonia is within limits, 1 otherwise.",
        value: |r| r.sud.data.status.nh3 as f64,
    },
    MetricSpec {
        name: "seneye_status_slide",
        help: "Slide is 0 if the slide is correctly installed and unexpired, 1 otherwise.",
        value: |r| r.sud.data.status.slide as f64,
    },
    MetricSpec {
        name: "seneye_status_kelvin",
        help: "Kelvin is 0 if the Kelvin measurement is within limits, 1 otherwise.",
        value: |r| r.sud.data.status.kelvin as f64,
    },
];

/// 接入计数指标。
pub const LDE_MESSAGES_TOTAL: &str = "seneye_lde_messages_total";
pub const LDE_MESSAGES_HELP: &str = "LDE push messages received, by processing result.";
pub const LDE_RESULT_LABEL: &str = "result";

#[cfg(test)]
mod tests {
    use super::READING_METRICS;
    use std::collections::HashSet;

    #[test]
    fn catalog_names_are_unique() {
        let names: HashSet<&str> = READING_METRICS.iter().map(|spec| spec.name).collect();
        assert_eq!(names.len(), READING_METRICS.len());
    }

    #[test]
    fn status_metrics_are_prefixed() {
        let status = READING_METRICS
            .iter()
            .filter(|spec| spec.name.starts_with("seneye_status_"))
            .count();
        assert_eq!(status, 6);
    }
}
