use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime};

/// Timeline granularity. Controls column width, tick spacing, and the
/// date↔pixel mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub enum ViewMode {
    QuarterDay,
    HalfDay,
    Day,
    Week,
    Month,
}

impl ViewMode {
    pub const ALL: [ViewMode; 5] = [
        ViewMode::QuarterDay,
        ViewMode::HalfDay,
        ViewMode::Day,
        ViewMode::Week,
        ViewMode::Month,
    ];

    /// Hours represented by one column. Month mode positions by
    /// normalized days instead, see [`TimeScale::date_to_x`].
    pub fn step_hours(self) -> i64 {
        match self {
            ViewMode::QuarterDay => 6,
            ViewMode::HalfDay => 12,
            ViewMode::Day => 24,
            ViewMode::Week => 168,
            ViewMode::Month => 720,
        }
    }

    pub fn min_column_width(self) -> f32 {
        match self {
            ViewMode::QuarterDay | ViewMode::HalfDay => 38.0,
            ViewMode::Day => 18.0,
            ViewMode::Week => 140.0,
            ViewMode::Month => 20.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::QuarterDay => "Quarter Day",
            ViewMode::HalfDay => "Half Day",
            ViewMode::Day => "Day",
            ViewMode::Week => "Week",
            ViewMode::Month => "Month",
        }
    }
}

/// Which edge of a bar an x coordinate represents when converting back to
/// a date. The right edge lands on 23:59:59 of the intended day instead of
/// midnight of the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Start,
    End,
}

fn end_of_month(date: NaiveDate) -> NaiveDate {
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .unwrap_or(date);
    first + Months::new(1) - chrono::Duration::days(1)
}

pub fn days_in_month(date: NaiveDate) -> i64 {
    end_of_month(date).day() as i64
}

/// Parameters for [`TimeScale::compute`].
#[derive(Debug, Clone, Copy)]
pub struct ScaleParams {
    pub available_width: f32,
    /// Overrides the width derived from the available space.
    pub column_width: Option<f32>,
    /// Overrides the mode's hour step (ignored in Month mode).
    pub step_hours: Option<i64>,
    pub left_margin: f32,
    /// Extra months appended to the visible range end.
    pub extend_months: u32,
}

/// The visible window and date↔pixel mapping for one view mode.
#[derive(Debug, Clone)]
pub struct TimeScale {
    pub mode: ViewMode,
    /// Range start, snapped to local midnight.
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Ordered tick dates. One grid column per tick.
    pub ticks: Vec<NaiveDateTime>,
    /// Hours per column (the configured override, or the mode's step).
    pub step_hours: i64,
    pub column_width: f32,
    pub left_margin: f32,
}

impl TimeScale {
    /// Establish the visible window around the observed task range.
    ///
    /// Sub-day modes pad by 7 days each side, Month mode snaps to calendar
    /// month boundaries, everything else pads by 1 day each side.
    pub fn compute(
        min_date: NaiveDateTime,
        max_date: NaiveDateTime,
        mode: ViewMode,
        params: ScaleParams,
    ) -> Self {
        let (start_day, end_day) = match mode {
            ViewMode::QuarterDay | ViewMode::HalfDay => (
                min_date.date() - chrono::Duration::days(7),
                max_date.date() + chrono::Duration::days(7),
            ),
            ViewMode::Month => (
                NaiveDate::from_ymd_opt(min_date.year(), min_date.month(), 1)
                    .unwrap_or_else(|| min_date.date()),
                end_of_month(max_date.date()),
            ),
            _ => (
                min_date.date() - chrono::Duration::days(1),
                max_date.date() + chrono::Duration::days(1),
            ),
        };
        let end_day = end_day + Months::new(params.extend_months);
        let start = start_day.and_time(NaiveTime::MIN);
        let end = end_day.and_time(NaiveTime::MIN);

        let step_hours = match mode {
            ViewMode::Month => mode.step_hours(),
            _ => params.step_hours.unwrap_or_else(|| mode.step_hours()).max(1),
        };
        let ticks = Self::generate_ticks(start, end, mode, step_hours);
        let base = match params.column_width {
            Some(w) => w,
            None => params.available_width / ticks.len().max(1) as f32,
        };
        let column_width = base.max(mode.min_column_width());

        Self {
            mode,
            start,
            end,
            ticks,
            step_hours,
            column_width,
            left_margin: params.left_margin,
        }
    }

    fn generate_ticks(
        start: NaiveDateTime,
        end: NaiveDateTime,
        mode: ViewMode,
        step_hours: i64,
    ) -> Vec<NaiveDateTime> {
        let mut ticks = Vec::new();
        if mode == ViewMode::Month {
            // One tick per calendar month, dated at the month's end.
            let mut month = start.date();
            loop {
                let tick = end_of_month(month).and_time(NaiveTime::MIN);
                ticks.push(tick);
                if tick >= end {
                    break;
                }
                month = month + Months::new(1);
            }
        } else {
            let step = chrono::Duration::hours(step_hours);
            let mut date = start;
            while date <= end {
                ticks.push(date);
                date += step;
            }
        }
        if ticks.is_empty() {
            ticks.push(start);
        }
        ticks
    }

    /// Columns (or column fractions) between the range start and `date`.
    /// Month mode counts normalized 30-day units.
    fn units_from_start(&self, date: NaiveDateTime) -> f32 {
        let secs = (date - self.start).num_seconds() as f64;
        (secs / self.unit_seconds()) as f32
    }

    fn unit_seconds(&self) -> f64 {
        match self.mode {
            ViewMode::Month => 30.0 * 86_400.0,
            _ => self.step_hours as f64 * 3_600.0,
        }
    }

    pub fn date_to_x(&self, date: NaiveDateTime) -> f32 {
        self.left_margin + self.units_from_start(date) * self.column_width
    }

    /// Algebraic inverse of [`Self::date_to_x`]. An `Edge::End` reading is
    /// pulled back one second so a column boundary resolves to the end of
    /// the previous day.
    pub fn x_to_date(&self, x: f32, edge: Edge) -> NaiveDateTime {
        let units = (x - self.left_margin) / self.column_width;
        let secs = (units as f64 * self.unit_seconds()).round() as i64;
        let date = self.start + chrono::Duration::seconds(secs);
        match edge {
            Edge::Start => date,
            Edge::End => date - chrono::Duration::seconds(1),
        }
    }

    /// Displayed width of the column at `tick_index`. Uniform in every
    /// mode except Month, where a month column spans its actual day count
    /// in normalized 30-day units.
    pub fn column_display_width(&self, tick_index: usize) -> f32 {
        match self.mode {
            ViewMode::Month => {
                let tick = self.ticks[tick_index.min(self.ticks.len() - 1)];
                self.column_width * days_in_month(tick.date()) as f32 / 30.0
            }
            _ => self.column_width,
        }
    }

    /// Left edge of the column at `tick_index`.
    pub fn column_x(&self, tick_index: usize) -> f32 {
        match self.mode {
            ViewMode::Month => {
                let tick = self.ticks[tick_index.min(self.ticks.len() - 1)];
                let month_start = NaiveDate::from_ymd_opt(tick.year(), tick.month(), 1)
                    .unwrap_or_else(|| tick.date());
                self.date_to_x(month_start.and_time(NaiveTime::MIN))
            }
            _ => self.date_to_x(self.ticks[tick_index.min(self.ticks.len() - 1)]),
        }
    }

    /// Total grid width in pixels, excluding the left margin.
    pub fn grid_width(&self) -> f32 {
        (0..self.ticks.len()).map(|i| self.column_display_width(i)).sum()
    }

    /// Pixel delta snapping unit for drags at this scale: 1/60 column in
    /// Month mode, 1/14 in Week mode, half a column otherwise.
    pub fn snap_unit(&self) -> f32 {
        match self.mode {
            ViewMode::Month => self.column_width / 60.0,
            ViewMode::Week => self.column_width / 14.0,
            _ => self.column_width / 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(NaiveTime::MIN)
    }

    fn params() -> ScaleParams {
        ScaleParams {
            available_width: 1200.0,
            column_width: None,
            step_hours: None,
            left_margin: 0.0,
            extend_months: 0,
        }
    }

    #[test]
    fn day_mode_pads_one_day_each_side() {
        let scale = TimeScale::compute(dt(2024, 1, 10), dt(2024, 1, 20), ViewMode::Day, params());
        assert_eq!(scale.start, dt(2024, 1, 9));
        assert_eq!(scale.end, dt(2024, 1, 21));
    }

    #[test]
    fn quarter_day_pads_seven_days() {
        let scale =
            TimeScale::compute(dt(2024, 1, 10), dt(2024, 1, 12), ViewMode::QuarterDay, params());
        assert_eq!(scale.start, dt(2024, 1, 3));
        assert_eq!(scale.end, dt(2024, 1, 19));
    }

    #[test]
    fn month_mode_snaps_to_calendar_months() {
        let scale = TimeScale::compute(dt(2024, 2, 14), dt(2024, 4, 2), ViewMode::Month, params());
        assert_eq!(scale.start, dt(2024, 2, 1));
        assert_eq!(scale.end, dt(2024, 4, 30));
        // One tick per month, dated at the month end.
        assert_eq!(scale.ticks[0], dt(2024, 2, 29));
        assert_eq!(scale.ticks.last().copied(), Some(dt(2024, 4, 30)));
        assert_eq!(scale.ticks.len(), 3);
    }

    #[test]
    fn extend_months_grows_the_end() {
        let mut p = params();
        p.extend_months = 2;
        let scale = TimeScale::compute(dt(2024, 1, 10), dt(2024, 1, 20), ViewMode::Day, p);
        assert_eq!(scale.end, dt(2024, 3, 21));
    }

    #[test]
    fn sub_day_ticks_step_by_hours_from_midnight() {
        let scale =
            TimeScale::compute(dt(2024, 1, 10), dt(2024, 1, 11), ViewMode::QuarterDay, params());
        let hours: Vec<u32> = scale.ticks.iter().take(5).map(|t| t.time().hour()).collect();
        assert_eq!(hours, vec![0, 6, 12, 18, 0]);
    }

    #[test]
    fn column_width_is_clamped_to_mode_minimum() {
        let mut p = params();
        p.available_width = 100.0; // far too narrow for the tick count
        let scale = TimeScale::compute(dt(2024, 1, 1), dt(2024, 3, 1), ViewMode::Week, p);
        assert_eq!(scale.column_width, ViewMode::Week.min_column_width());
    }

    #[test]
    fn month_column_width_uses_thirty_day_normalization() {
        let scale = TimeScale::compute(dt(2024, 1, 5), dt(2024, 1, 20), ViewMode::Month, params());
        // January has 31 days.
        let expected = scale.column_width * 31.0 / 30.0;
        assert!((scale.column_display_width(0) - expected).abs() < 1e-3);
    }

    #[test]
    fn x_to_date_inverts_date_to_x_in_every_mode() {
        for mode in ViewMode::ALL {
            let scale = TimeScale::compute(dt(2024, 1, 1), dt(2024, 6, 1), mode, params());
            let probe = dt(2024, 3, 7);
            let back = scale.x_to_date(scale.date_to_x(probe), Edge::Start);
            let slack = chrono::Duration::hours(1);
            assert!(
                (back - probe).abs() <= slack,
                "{mode:?}: {probe} -> {back}"
            );
        }
    }

    #[test]
    fn end_edge_lands_on_previous_second() {
        let scale = TimeScale::compute(dt(2024, 1, 1), dt(2024, 2, 1), ViewMode::Day, params());
        let x = scale.date_to_x(dt(2024, 1, 10));
        let end = scale.x_to_date(x, Edge::End);
        assert_eq!(end.date(), NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
        assert_eq!(end.time(), NaiveTime::from_hms_opt(23, 59, 59).unwrap());
    }

    #[test]
    fn left_margin_offsets_the_mapping() {
        let mut p = params();
        p.left_margin = 200.0;
        let scale = TimeScale::compute(dt(2024, 1, 1), dt(2024, 2, 1), ViewMode::Day, p);
        assert_eq!(scale.date_to_x(scale.start), 200.0);
    }

    #[test]
    fn snap_units_follow_the_mode() {
        let scale = TimeScale::compute(dt(2024, 1, 1), dt(2024, 6, 1), ViewMode::Month, params());
        assert!((scale.snap_unit() - scale.column_width / 60.0).abs() < f32::EPSILON);
        let scale = TimeScale::compute(dt(2024, 1, 1), dt(2024, 6, 1), ViewMode::Week, params());
        assert!((scale.snap_unit() - scale.column_width / 14.0).abs() < f32::EPSILON);
        let scale = TimeScale::compute(dt(2024, 1, 1), dt(2024, 6, 1), ViewMode::Day, params());
        assert!((scale.snap_unit() - scale.column_width / 2.0).abs() < f32::EPSILON);
    }
}
