// The fixed fleet-telemetry query
/// Minute-bucketed telemetry aggregation with the derived efficiency
/// ratio. The dashboard never varies this text; all filtering happens
/// in-process on the loaded table.
pub fn fleet_telemetry_query(database: &str) -> String {
    format!(
        r#"
    WITH
    telematics AS (
    SELECT
        display_name,
        device_time,
        positioning.position,
        positioning.longitude_degrees AS lon,
        positioning.latitude_degrees AS lat,
        base_vehicle.speed_kilometres_per_hour AS speed_km_h,
        base_vehicle.total_vehicle_distance_km AS vehicle_distance_km,
        positioning.altitude_metres AS altitude_metres,
        (CASE
            WHEN battery.consumed_energy_j IS NULL THEN battery.total_battery_voltage_volts*battery.total_battery_current_amperes
        ELSE
        battery.consumed_energy_j
        END
        ) AS consumed_energy_j
    FROM
        `{database}.clean_telematics` telematics
    WHERE
        base_vehicle.vehicle_state = 'driving'
        AND positioning.position IS NOT NULL
        AND battery.total_battery_current_amperes IS NOT NULL
        ),
    minute_telematics AS (
    SELECT
    display_name AS truck,
    timestamp_trunc(device_time, MINUTE) AS date_time,
    ANY_VALUE(lon) AS lon,
    ANY_VALUE(lat) AS lat,
    ROUND(AVG(speed_km_h)) AS speed_km_h,
    ROUND(AVG(altitude_metres)) AS altitude_m,
    ROUND(AVG(consumed_energy_j) * 2.77778e-7, 4) AS avg_kwh,
    ROUND(SUM(consumed_energy_j) * 2.77778e-7, 4) AS sum_kwh,
    ROUND(MAX(vehicle_distance_km) - MIN(vehicle_distance_km), 2) AS distance_travelled_km,
    COUNT(1) AS nr_samples
    FROM telematics
    GROUP BY display_name, timestamp_trunc(device_time, MINUTE)
    )

    SELECT
    *,
    ROUND(sum_kwh / distance_travelled_km, 1) AS kwh_km
    FROM minute_telematics
    WHERE distance_travelled_km != 0
    AND distance_travelled_km IS NOT NULL
    AND nr_samples > 40
    AND speed_km_h > 25
    AND speed_km_h / distance_travelled_km < 100
    ORDER BY date_time
    "#
    )
}
