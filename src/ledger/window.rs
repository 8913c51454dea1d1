use chrono::{DateTime, Days, LocalResult, NaiveDate, NaiveTime, Offset, TimeZone};

/// Intervalle semi-ouvert `[start, end)` aligné sur des minuits locaux.
///
/// Seul point de calcul des bornes de jour : la liste des non-rentrés et les
/// exports passent tous les deux par ici.
#[derive(Debug, Clone)]
pub struct DayWindow<Tz: TimeZone> {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl<Tz: TimeZone> DayWindow<Tz> {
    /// Journée calendaire locale contenant `now`.
    pub fn today(now: &DateTime<Tz>) -> Self {
        Self::last_days(now, 0)
    }

    /// Du minuit local d'il y a `days` jours jusqu'au prochain minuit local.
    pub fn last_days(now: &DateTime<Tz>, days: u32) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        let first = today
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        let next = today.succ_opt().unwrap_or(NaiveDate::MAX);
        Self {
            start: local_midnight(&tz, first),
            end: local_midnight(&tz, next),
        }
    }

    pub fn contains<Other: TimeZone>(&self, at: &DateTime<Other>) -> bool {
        let at = at.with_timezone(&self.start.timezone());
        self.start <= at && at < self.end
    }
}

/// Premier instant du jour `date` dans `tz`.
pub fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        // minuit sauté par un changement d'heure : le jour commence à la fin du trou
        LocalResult::None => {
            let offset = tz.offset_from_utc_datetime(&midnight).fix();
            let utc = midnight - chrono::Duration::seconds(i64::from(offset.local_minus_utc()));
            tz.from_utc_datetime(&utc)
        }
    }
}

/// Périodes d'export proposées au surveillant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportRange {
    Today,
    LastSevenDays,
}

impl ExportRange {
    pub fn window<Tz: TimeZone>(self, now: &DateTime<Tz>) -> DayWindow<Tz> {
        match self {
            ExportRange::Today => DayWindow::today(now),
            ExportRange::LastSevenDays => DayWindow::last_days(now, 7),
        }
    }

    /// Nom de fichier par défaut (`hostel_logs_<date locale>.csv` pour la journée).
    pub fn file_name<Tz: TimeZone>(self, now: &DateTime<Tz>) -> String {
        match self {
            ExportRange::Today => format!("hostel_logs_{}.csv", now.date_naive().format("%Y-%m-%d")),
            ExportRange::LastSevenDays => "hostel_logs_last_7_days.csv".to_string(),
        }
    }
}
