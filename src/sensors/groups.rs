/// Sensor group definitions and the static tables they are built from
// Controller unit-of-measure codes
const UOM_FAHRENHEIT: u16 = 17;
const UOM_PERCENT: u16 = 22;
const UOM_INHG: u16 = 23;
const UOM_INDEX: u16 = 25;
const UOM_MPH: u16 = 48;
const UOM_UV_INDEX: u16 = 71;
const UOM_WATTS_PER_M2: u16 = 74;
const UOM_DEGREES: u16 = 76;
const UOM_INCHES: u16 = 105;

/// Number of auxiliary temperature/humidity probes a station can report.
pub const AUX_SENSOR_COUNT: u8 = 8;

/// One slot of a group and the reading field that feeds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotBinding {
    pub slot: &'static str,
    pub field: String,
    pub uom: u16,
}

/// A slot whose value is computed rather than copied from the reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerivedSlot {
    /// Pressure trend over the absolute pressure in `source_field`.
    PressureTrend {
        slot: &'static str,
        source_field: &'static str,
        uom: u16,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorGroupDefinition {
    pub id: String,
    pub name: String,
    pub slots: Vec<SlotBinding>,
    pub derived: Option<DerivedSlot>,
}

struct GroupTemplate {
    id: &'static str,
    name: &'static str,
    slots: &'static [(&'static str, &'static str, u16)],
    derived: Option<(&'static str, &'static str, u16)>,
}

const FIXED_GROUPS: &[GroupTemplate] = &[
    GroupTemplate {
        id: "temperature",
        name: "Temperatures",
        slots: &[
            ("ST", "tempf", UOM_FAHRENHEIT),
            ("GV0", "feelsLike", UOM_FAHRENHEIT),
            ("GV1", "dewPoint", UOM_FAHRENHEIT),
        ],
        derived: None,
    },
    GroupTemplate {
        id: "humidity",
        name: "Humidity",
        slots: &[("ST", "humidity", UOM_PERCENT)],
        derived: None,
    },
    GroupTemplate {
        id: "pressure",
        name: "Barometric Pressure",
        slots: &[
            ("ST", "baromabsin", UOM_INHG),
            ("GV0", "baromrelin", UOM_INHG),
        ],
        derived: Some(("GV1", "baromabsin", UOM_INDEX)),
    },
    GroupTemplate {
        id: "wind",
        name: "Wind",
        slots: &[
            ("ST", "windspeedmph", UOM_MPH),
            ("GV0", "winddir", UOM_DEGREES),
            ("GV1", "windgustmph", UOM_MPH),
        ],
        derived: None,
    },
    GroupTemplate {
        id: "precipitation",
        name: "Precipitation",
        slots: &[
            ("GV0", "hourlyrainin", UOM_INCHES),
            ("GV1", "dailyrainin", UOM_INCHES),
            ("GV2", "weeklyrainin", UOM_INCHES),
            ("GV3", "monthlyrainin", UOM_INCHES),
            ("GV4", "yearlyrainin", UOM_INCHES),
        ],
        derived: None,
    },
    GroupTemplate {
        id: "light",
        name: "Illumination",
        slots: &[
            ("ST", "uv", UOM_UV_INDEX),
            ("GV0", "solarradiation", UOM_WATTS_PER_M2),
        ],
        derived: None,
    },
];

const INDOOR_GROUP: GroupTemplate = GroupTemplate {
    id: "indoor",
    name: "Indoor Sensor",
    slots: &[
        ("ST", "tempinf", UOM_FAHRENHEIT),
        ("GV0", "humidityin", UOM_PERCENT),
    ],
    derived: None,
};

impl GroupTemplate {
    fn build(&self) -> SensorGroupDefinition {
        SensorGroupDefinition {
            id: self.id.to_string(),
            name: self.name.to_string(),
            slots: self
                .slots
                .iter()
                .map(|&(slot, field, uom)| SlotBinding {
                    slot,
                    field: field.to_string(),
                    uom,
                })
                .collect(),
            derived: self
                .derived
                .map(|(slot, source_field, uom)| DerivedSlot::PressureTrend {
                    slot,
                    source_field,
                    uom,
                }),
        }
    }
}

/// Groups present from startup, in dispatch order.
pub fn fixed_groups(indoor_enabled: bool) -> Vec<SensorGroupDefinition> {
    let mut groups: Vec<SensorGroupDefinition> = FIXED_GROUPS.iter().map(GroupTemplate::build).collect();
    if indoor_enabled {
        groups.push(INDOOR_GROUP.build());
    }
    groups
}

/// Reading field whose presence announces auxiliary probe `index` (1-based).
pub fn aux_trigger_field(index: u8) -> String {
    format!("temp{}f", index)
}

pub fn aux_group_id(index: u8) -> String {
    format!("sensor{:02}", index)
}

/// Definition of auxiliary probe group `index` (1-based).
pub fn aux_group(index: u8) -> SensorGroupDefinition {
    SensorGroupDefinition {
        id: aux_group_id(index),
        name: format!("Auxiliary Sensor {}", index),
        slots: vec![
            SlotBinding {
                slot: "ST",
                field: aux_trigger_field(index),
                uom: UOM_FAHRENHEIT,
            },
            SlotBinding {
                slot: "GV0",
                field: format!("humidity{}", index),
                uom: UOM_PERCENT,
            },
        ],
        derived: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_groups_in_order() {
        let ids: Vec<String> = fixed_groups(false).into_iter().map(|g| g.id).collect();
        assert_eq!(
            ids,
            vec!["temperature", "humidity", "pressure", "wind", "precipitation", "light"]
        );

        let with_indoor = fixed_groups(true);
        assert_eq!(with_indoor.len(), 7);
        assert_eq!(with_indoor[6].id, "indoor");
    }

    #[test]
    fn only_pressure_has_a_derived_slot() {
        for group in fixed_groups(true) {
            if group.id == "pressure" {
                assert_eq!(
                    group.derived,
                    Some(DerivedSlot::PressureTrend {
                        slot: "GV1",
                        source_field: "baromabsin",
                        uom: UOM_INDEX,
                    })
                );
            } else {
                assert!(group.derived.is_none(), "{} has a derived slot", group.id);
            }
        }
    }

    #[test]
    fn aux_group_fields() {
        let group = aux_group(3);
        assert_eq!(group.id, "sensor03");
        assert_eq!(group.slots[0].field, "temp3f");
        assert_eq!(group.slots[1].field, "humidity3");
        assert_eq!(aux_trigger_field(8), "temp8f");
    }
}
