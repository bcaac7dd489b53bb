//! Scraping of the results site's personal-best pages.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use swim_core::models::{Course, Distance, Stroke};
use swim_core::services::time_codec::parse_time;

use crate::candidate::ImportCandidate;
use crate::stroke_mapper::{ResultsSiteStrokeMapper, StrokeMapper};

const NOT_RECOGNISED: &str = "We do not recognise that membership number";

lazy_static! {
    static ref LONG_COURSE_SECTION: Regex =
        Regex::new(r#"<p class="rnk_sj">Long Course</p>[\s\S]*?<table[^>]*>([\s\S]*?)</table>"#)
            .unwrap();
    static ref SHORT_COURSE_SECTION: Regex =
        Regex::new(r#"<p class="rnk_sj">Short Course</p>[\s\S]*?<table[^>]*>([\s\S]*?)</table>"#)
            .unwrap();
    static ref DETAIL_LINK: Regex =
        Regex::new(r#"<a\s+href="\./(personal_best_time_date\.php\?[^"]+)"[^>]*>([\s\S]*?)</a>"#)
            .unwrap();
    static ref DATE_ORDER_TABLE: Regex =
        Regex::new(r#"Swims in Date Order</p>[\s\S]*?<table[^>]*>([\s\S]*?)</table>"#).unwrap();
    static ref ROW: Regex = Regex::new(r#"<tr[^>]*>([\s\S]*?)</tr>"#).unwrap();
    static ref CELL: Regex = Regex::new(r#"<td[^>]*>([\s\S]*?)</td>"#).unwrap();
    static ref TAG: Regex = Regex::new(r#"<[^>]*>"#).unwrap();
    static ref EVENT_NAME: Regex = Regex::new(r#"(\d+)m?\s+(.+)"#).unwrap();
}

// Detail table columns: Time, WA Pts, Round, Date, Meet, Venue, Club, Level
const TIME_COLUMN: usize = 0;
const DATE_COLUMN: usize = 3;
const MEET_COLUMN: usize = 4;
const MIN_COLUMNS: usize = 5;

/// Link from the personal-best summary to one event's full swim history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailLink {
    pub url: String,
    pub event_name: String,
    pub course: Course,
}

pub fn is_unrecognised(html: &str) -> bool {
    html.contains(NOT_RECOGNISED)
}

/// Detail links of the long-course then short-course summary tables.
pub fn detail_links(html: &str, base_url: &str) -> Vec<DetailLink> {
    let base_url = base_url.trim_end_matches('/');
    let sections = [
        (&*LONG_COURSE_SECTION, Course::LongCourse),
        (&*SHORT_COURSE_SECTION, Course::ShortCourse),
    ];

    let mut links = Vec::new();
    for (section, course) in sections {
        let Some(table) = section.captures(html).and_then(|captures| captures.get(1)) else {
            debug!(%course, "No summary table for course");
            continue;
        };
        for captures in DETAIL_LINK.captures_iter(table.as_str()) {
            links.push(DetailLink {
                url: format!("{}/{}", base_url, captures[1].replace("&amp;", "&")),
                event_name: clean(&captures[2]),
                course,
            });
        }
    }
    links
}

/// Splits "50 Freestyle" or "200m Individual Medley" into stroke and distance.
pub fn parse_event_name(name: &str) -> Option<(Stroke, Distance)> {
    let captures = EVENT_NAME.captures(name)?;
    let distance = captures[1]
        .parse::<u16>()
        .ok()
        .and_then(|meters| Distance::try_from(meters).ok())?;
    let stroke = ResultsSiteStrokeMapper.map_stroke(captures[2].trim())?;
    Some((stroke, distance))
}

/// `dd/mm/yy` or `dd/mm/yyyy`. Two-digit years are taken as 20yy.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let mut parts = text.trim().split('/');
    let day = parts.next()?.parse::<u32>().ok()?;
    let month = parts.next()?.parse::<u32>().ok()?;
    let year_text = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let year = match year_text.len() {
        2 => 2000 + year_text.parse::<i32>().ok()?,
        4 => year_text.parse::<i32>().ok()?,
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Every well-formed row of the "Swims in Date Order" table. Rows whose
/// time or date cannot be read are skipped.
pub fn parse_detail_page(html: &str, link: &DetailLink) -> Vec<ImportCandidate> {
    let Some((stroke, distance)) = parse_event_name(&link.event_name) else {
        debug!(event = %link.event_name, "Unrecognised event name");
        return Vec::new();
    };
    let Some(table) = DATE_ORDER_TABLE.captures(html).and_then(|captures| captures.get(1)) else {
        debug!(event = %link.event_name, "No date-order table");
        return Vec::new();
    };

    ROW.captures_iter(table.as_str())
        .filter_map(|row| {
            let cells: Vec<String> = CELL
                .captures_iter(&row[1])
                .map(|cell| clean(&cell[1]))
                .collect();
            if cells.len() < MIN_COLUMNS {
                return None;
            }

            let time_text = cells[TIME_COLUMN].clone();
            if parse_time(&time_text).is_err() {
                debug!(time = %time_text, "Skipping row with unreadable time");
                return None;
            }
            let Some(date) = parse_date(&cells[DATE_COLUMN]) else {
                debug!(date = %cells[DATE_COLUMN], "Skipping row with unreadable date");
                return None;
            };
            let meet_name = Some(cells[MEET_COLUMN].clone()).filter(|name| !name.is_empty());

            Some(ImportCandidate {
                stroke,
                distance,
                course: link.course,
                date,
                time_text,
                meet_name,
            })
        })
        .collect()
}

fn clean(fragment: &str) -> String {
    TAG.replace_all(fragment, "")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY: &str = r#"
        <p class="rnk_sj">Long Course</p>
        <table class="rnk_tbl">
          <tr><th>Event</th><th>Time</th></tr>
          <tr><td><a href="./personal_best_time_date.php?back=individualbest&amp;tiref=123&amp;mode=L&amp;tstroke=1&amp;tcourse=L" class="rnk_lnk">50 Freestyle</a></td><td>30.12</td></tr>
        </table>
        <p class="rnk_sj">Short Course</p>
        <table class="rnk_tbl">
          <tr><td><a href="./personal_best_time_date.php?tiref=123&amp;tstroke=16&amp;tcourse=S">200 Individual Medley</a></td><td>2:41.90</td></tr>
          <tr><td><a href="./personal_best_time_date.php?tiref=123&amp;tstroke=2&amp;tcourse=S">100 Breaststroke</a></td><td>1:25.00</td></tr>
        </table>
    "#;

    const DETAIL: &str = r#"
        <p class="rnk_sj">Swims in Date Order</p>
        <table id="rankTable">
          <tr><th>Time</th><th>WA Pts</th><th>Round</th><th>Date</th><th>Meet</th><th>Venue</th></tr>
          <tr><td>30.12</td><td>412</td><td>H</td><td>14/06/24</td><td>Summer&nbsp;Open</td><td>Basildon</td></tr>
          <tr><td>31.05</td><td>380</td><td>F</td><td>02/03/2024</td><td></td><td>Chelmsford</td></tr>
          <tr><td>DQ</td><td></td><td>H</td><td>01/02/24</td><td>Winter Meet</td><td>Harlow</td></tr>
          <tr><td>30.90</td><td>390</td><td>H</td><td>31/02/24</td><td>Bad Date</td><td>Harlow</td></tr>
          <tr><td>30.90</td></tr>
        </table>
    "#;

    fn free50_link() -> DetailLink {
        DetailLink {
            url: "https://example.test/detail".to_string(),
            event_name: "50 Freestyle".to_string(),
            course: Course::LongCourse,
        }
    }

    #[test]
    fn test_unrecognised_member() {
        assert!(is_unrecognised(
            "<p>We do not recognise that membership number. Please try again.</p>"
        ));
        assert!(!is_unrecognised(SUMMARY));
    }

    #[test]
    fn test_detail_links_by_course() {
        let links = detail_links(SUMMARY, "https://www.swimmingresults.org/individualbest/");
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].course, Course::LongCourse);
        assert_eq!(links[0].event_name, "50 Freestyle");
        assert_eq!(
            links[0].url,
            "https://www.swimmingresults.org/individualbest/personal_best_time_date.php?back=individualbest&tiref=123&mode=L&tstroke=1&tcourse=L"
        );
        assert_eq!(links[1].course, Course::ShortCourse);
        assert_eq!(links[2].event_name, "100 Breaststroke");
    }

    #[test]
    fn test_parse_event_name() {
        assert_eq!(
            parse_event_name("200 Individual Medley"),
            Some((Stroke::IndividualMedley, Distance::M200))
        );
        assert_eq!(parse_event_name("50m Butterfly"), Some((Stroke::Butterfly, Distance::M50)));
        assert_eq!(parse_event_name("75 Freestyle"), None);
        assert_eq!(parse_event_name("Freestyle"), None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("14/06/24"), NaiveDate::from_ymd_opt(2024, 6, 14));
        assert_eq!(parse_date("02/03/2024"), NaiveDate::from_ymd_opt(2024, 3, 2));
        assert_eq!(parse_date("31/02/24"), None);
        assert_eq!(parse_date("2024-03-02"), None);
        assert_eq!(parse_date("1/2/345"), None);
    }

    #[test]
    fn test_parse_detail_page_drops_malformed_rows() {
        let candidates = parse_detail_page(DETAIL, &free50_link());
        assert_eq!(candidates.len(), 2);

        assert_eq!(candidates[0].time_text, "30.12");
        assert_eq!(candidates[0].date, NaiveDate::from_ymd_opt(2024, 6, 14).unwrap());
        assert_eq!(candidates[0].meet_name.as_deref(), Some("Summer Open"));
        assert_eq!(candidates[0].stroke, Stroke::Freestyle);
        assert_eq!(candidates[0].course, Course::LongCourse);

        assert_eq!(candidates[1].meet_name, None);
    }

    #[test]
    fn test_parse_detail_page_without_table() {
        assert!(parse_detail_page("<html></html>", &free50_link()).is_empty());
    }
}
