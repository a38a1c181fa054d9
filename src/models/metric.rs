//! KPI bundle cached on a completed plan.
//!
//! # Reference
//! `examples/original_source/utils/kpi_calculator.py::calcular_metricas_completas`
//! for the field set; `calcular_eficiencia_machines` for the per-machine
//! breakdown supplement.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-machine efficiency breakdown backing the global `Metric`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MachineEfficiency {
    pub productive_min: u32,
    /// Minutes of recorded stoppage time on this machine, used as the
    /// setup-time proxy the original accumulates via `tiempo_paradas`.
    pub setup_min: u32,
    pub utilization_pct: f64,
}

/// Computed KPI bundle for a [`super::programacion::Programacion`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    pub programacion_id: String,
    pub fecha_calculo: NaiveDateTime,
    pub disponibilidad_oee: f64,
    pub rendimiento_oee: f64,
    pub calidad_oee: f64,
    pub oee_global: f64,
    pub otif_porcentaje: f64,
    pub utilizacion_global_pct: f64,
    /// Machine ID of the highest-utilization machine above the 85%
    /// bottleneck threshold (spec §4.6), `None` if no machine qualifies.
    pub cuello_botella: Option<String>,
    pub makespan_real_min: u32,
    pub per_machine: BTreeMap<String, MachineEfficiency>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn metric_serializes_with_optional_bottleneck_absent() {
        let m = Metric {
            programacion_id: "PROG-2026-W30-001".into(),
            fecha_calculo: NaiveDate::from_ymd_opt(2026, 7, 27)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            disponibilidad_oee: 90.0,
            rendimiento_oee: 95.0,
            calidad_oee: 99.0,
            oee_global: 84.645,
            otif_porcentaje: 80.0,
            utilizacion_global_pct: 70.0,
            cuello_botella: None,
            makespan_real_min: 1200,
            per_machine: BTreeMap::new(),
        };
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("\"cuello_botella\":null"));
    }
}
