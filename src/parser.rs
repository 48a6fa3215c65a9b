use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{GpxError, Result};
use crate::model::*;
use crate::options::ReadOptions;

type XmlReader<'a> = Reader<&'a [u8]>;

const DEFAULT_VERSION: &str = "1.1";
const DEFAULT_CREATOR: &str = "unknown";

/// Parse a GPX XML string into a [`Gpx`] document, skipping invalid values.
pub fn parse_gpx(xml: &str) -> Result<Gpx> {
    parse_gpx_with(xml, &ReadOptions::default())
}

/// Parse a GPX XML string into a [`Gpx`] document.
pub fn parse_gpx_with(xml: &str, opts: &ReadOptions) -> Result<Gpx> {
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"gpx" => {
                let mut gpx = new_document(&e, opts)?;
                parse_document_body(&mut reader, &mut gpx, opts)?;
                log::debug!(
                    "parsed GPX {} from '{}': {} waypoints, {} routes, {} tracks",
                    gpx.version(),
                    gpx.creator(),
                    gpx.waypoints().len(),
                    gpx.routes().len(),
                    gpx.tracks().len()
                );
                return Ok(gpx);
            }
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"gpx" => {
                return new_document(&e, opts);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxError::XmlParse(e)),
            _ => {}
        }
    }

    Err(GpxError::MissingRequired {
        element: "gpx",
        field: "root element",
    })
}

/// Apply the read mode to a value-level result: strict propagates, lenient
/// logs and yields `None`.
fn recover<T>(opts: &ReadOptions, result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if opts.strict => Err(e),
        Err(e) => {
            log::warn!("skipping invalid GPX value: {e}");
            Ok(None)
        }
    }
}

fn new_document(start: &BytesStart<'_>, opts: &ReadOptions) -> Result<Gpx> {
    let version = attr_or_default(start, "version", DEFAULT_VERSION, opts)?;
    let creator = attr_or_default(start, "creator", DEFAULT_CREATOR, opts)?;
    Gpx::new(&version, &creator)
}

fn attr_or_default(
    start: &BytesStart<'_>,
    field: &'static str,
    default: &str,
    opts: &ReadOptions,
) -> Result<String> {
    match recover(opts, attr_value(start, "gpx", field.as_bytes()))?.flatten() {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ if opts.strict => Err(GpxError::MissingRequired {
            element: "gpx",
            field,
        }),
        _ => {
            log::warn!("<gpx> has no '{field}', assuming '{default}'");
            Ok(default.to_string())
        }
    }
}

/// Read one attribute by local name, unescaping entity references.
/// An undecodable value is an `InvalidValue` on `element`.
fn attr_value(start: &BytesStart<'_>, element: &'static str, name: &[u8]) -> Result<Option<String>> {
    for attr_result in start.attributes() {
        let attr = attr_result.map_err(|e| GpxError::XmlParse(e.into()))?;
        if attr.key.local_name().as_ref() == name {
            let raw = String::from_utf8_lossy(&attr.value);
            let value = quick_xml::escape::unescape(&raw).map_err(|_| GpxError::InvalidValue {
                element,
                value: raw.to_string(),
            })?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn required_attr(
    start: &BytesStart<'_>,
    element: &'static str,
    field: &'static str,
) -> Result<String> {
    attr_value(start, element, field.as_bytes())?.ok_or(GpxError::MissingRequired { element, field })
}

fn parse_num<T: FromStr>(element: &'static str, text: &str) -> Result<T> {
    text.trim().parse::<T>().map_err(|_| GpxError::InvalidValue {
        element,
        value: text.to_string(),
    })
}

/// Parse an `xsd:dateTime`. Values without an offset are taken as UTC.
fn parse_time(element: &'static str, text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Ok(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|t| t.and_utc())
        .map_err(|_| GpxError::InvalidValue {
            element,
            value: text.to_string(),
        })
}

/// Children of `<gpx>`. GPX 1.0 puts document fields directly on the root;
/// those are folded into the metadata.
fn parse_document_body(reader: &mut XmlReader<'_>, gpx: &mut Gpx, opts: &ReadOptions) -> Result<()> {
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"metadata" => {
                    let metadata = parse_metadata(reader, opts)?;
                    gpx.set_metadata(metadata);
                }
                b"wpt" => {
                    if let Some(pt) = parse_point(&e, "wpt", reader, opts)? {
                        gpx.add_waypoint(pt);
                    }
                }
                b"rte" => {
                    gpx.add_route(parse_route(reader, opts)?);
                }
                b"trk" => {
                    gpx.add_track(parse_track(reader, opts)?);
                }
                b"name" => gpx.metadata_or_default().name = Some(read_text_owned(reader, &e)?),
                b"desc" => gpx.metadata_or_default().desc = Some(read_text_owned(reader, &e)?),
                b"keywords" => {
                    gpx.metadata_or_default().keywords = Some(read_text_owned(reader, &e)?)
                }
                b"time" => {
                    let text = read_text_owned(reader, &e)?;
                    if let Some(time) = recover(opts, parse_time("time", &text))? {
                        gpx.metadata_or_default().time = Some(time);
                    }
                }
                b"bounds" => {
                    let bounds = recover(opts, bounds_from_attrs(&e))?;
                    reader.read_to_end(e.name())?;
                    if bounds.is_some() {
                        gpx.metadata_or_default().bounds = bounds;
                    }
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"wpt" => {
                    if let Some(pt) = recover(opts, new_point(&e, "wpt"))? {
                        gpx.add_waypoint(pt);
                    }
                }
                b"bounds" => {
                    if let Some(bounds) = recover(opts, bounds_from_attrs(&e))? {
                        gpx.metadata_or_default().bounds = Some(bounds);
                    }
                }
                b"trk" => {
                    gpx.add_track(Track::new());
                }
                b"rte" => {
                    gpx.add_route(Route::new());
                }
                _ => {}
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"gpx" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(())
}

/// Parse a <metadata> element.
fn parse_metadata(reader: &mut XmlReader<'_>, opts: &ReadOptions) -> Result<Metadata> {
    let mut metadata = Metadata::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"name" => metadata.name = Some(read_text_owned(reader, &e)?),
                b"desc" => metadata.desc = Some(read_text_owned(reader, &e)?),
                b"keywords" => metadata.keywords = Some(read_text_owned(reader, &e)?),
                b"time" => {
                    let text = read_text_owned(reader, &e)?;
                    metadata.time = recover(opts, parse_time("time", &text))?;
                }
                b"author" => metadata.author = Some(parse_person(reader, opts)?),
                b"copyright" => metadata.copyright = parse_copyright(&e, reader, opts)?,
                b"link" => {
                    if let Some(link) = parse_link(&e, reader, opts)? {
                        metadata.add_link(link);
                    }
                }
                b"bounds" => {
                    metadata.bounds = recover(opts, bounds_from_attrs(&e))?;
                    reader.read_to_end(e.name())?;
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"bounds" => metadata.bounds = recover(opts, bounds_from_attrs(&e))?,
                b"link" => {
                    if let Some(link) = recover(opts, build_link(&e, None, None))? {
                        metadata.add_link(link);
                    }
                }
                b"copyright" => {
                    metadata.copyright = recover(opts, copyright_from_attrs(&e))?;
                }
                _ => {}
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"metadata" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(metadata)
}

fn bounds_from_attrs(e: &BytesStart<'_>) -> Result<Bounds> {
    let corner = |field: &'static str| -> Result<f64> {
        let text = required_attr(e, "bounds", field)?;
        parse_num("bounds", &text)
    };
    Bounds::new(corner("minlat")?, corner("minlon")?, corner("maxlat")?, corner("maxlon")?)
}

/// Parse an <author> element (personType).
fn parse_person(reader: &mut XmlReader<'_>, opts: &ReadOptions) -> Result<Person> {
    let mut person = Person::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"name" => person.name = Some(read_text_owned(reader, &e)?),
                b"email" => {
                    person.email = recover(opts, email_from_attrs(&e))?;
                    reader.read_to_end(e.name())?;
                }
                b"link" => person.link = parse_link(&e, reader, opts)?,
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"email" => person.email = recover(opts, email_from_attrs(&e))?,
                b"link" => person.link = recover(opts, build_link(&e, None, None))?,
                _ => {}
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"author" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(person)
}

fn email_from_attrs(e: &BytesStart<'_>) -> Result<Email> {
    let id = required_attr(e, "email", "id")?;
    let domain = required_attr(e, "email", "domain")?;
    Email::new(&id, &domain)
}

fn copyright_from_attrs(e: &BytesStart<'_>) -> Result<Copyright> {
    let author = required_attr(e, "copyright", "author")?;
    Copyright::new(&author, None, None)
}

/// Parse a <copyright> element. A bad year or license only drops that field.
fn parse_copyright(
    start: &BytesStart<'_>,
    reader: &mut XmlReader<'_>,
    opts: &ReadOptions,
) -> Result<Option<Copyright>> {
    let mut year: Option<String> = None;
    let mut license: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"year" => year = Some(read_text_owned(reader, &e)?),
                b"license" => license = Some(read_text_owned(reader, &e)?),
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"copyright" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxError::XmlParse(e)),
            _ => {}
        }
    }

    let Some(mut copyright) = recover(opts, copyright_from_attrs(start))? else {
        return Ok(None);
    };
    if let Some(text) = year {
        recover(opts, parse_num::<i32>("year", &text).and_then(|y| copyright.set_year(Some(y))))?;
    }
    if let Some(text) = license {
        recover(opts, copyright.set_license(Some(text.trim())))?;
    }
    Ok(Some(copyright))
}

/// Create a point from the lat/lon attributes of a wpt, rtept or trkpt tag.
fn new_point(start: &BytesStart<'_>, element: &'static str) -> Result<Waypoint> {
    let lat = parse_num(element, &required_attr(start, element, "lat")?)?;
    let lon = parse_num(element, &required_attr(start, element, "lon")?)?;
    Waypoint::new(lat, lon)
}

/// Parse a point element (wpt, rtept, trkpt) and its children.
/// Called after receiving Event::Start for the point element.
fn parse_point(
    start: &BytesStart<'_>,
    element: &'static str,
    reader: &mut XmlReader<'_>,
    opts: &ReadOptions,
) -> Result<Option<Waypoint>> {
    let Some(mut point) = recover(opts, new_point(start, element))? else {
        reader.read_to_end(start.name())?;
        return Ok(None);
    };
    let end_name = start.name().0.to_vec();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"ele" => {
                    let text = read_text_owned(reader, &e)?;
                    point.ele = recover(opts, parse_num("ele", &text))?;
                }
                b"time" => {
                    let text = read_text_owned(reader, &e)?;
                    point.time = recover(opts, parse_time("time", &text))?;
                }
                b"magvar" => {
                    let text = read_text_owned(reader, &e)?;
                    if let Some(degrees) = recover(opts, parse_num("magvar", &text))? {
                        point.set_magvar(degrees);
                    }
                }
                b"geoidheight" => {
                    let text = read_text_owned(reader, &e)?;
                    point.geoidheight = recover(opts, parse_num("geoidheight", &text))?;
                }
                b"name" => point.name = Some(read_text_owned(reader, &e)?),
                b"cmt" => point.cmt = Some(read_text_owned(reader, &e)?),
                b"desc" => point.desc = Some(read_text_owned(reader, &e)?),
                b"src" => point.src = Some(read_text_owned(reader, &e)?),
                b"sym" => point.sym = Some(read_text_owned(reader, &e)?),
                b"type" => point.point_type = Some(read_text_owned(reader, &e)?),
                b"link" => {
                    if let Some(link) = parse_link(&e, reader, opts)? {
                        point.add_link(link);
                    }
                }
                b"fix" => {
                    let text = read_text_owned(reader, &e)?;
                    recover(opts, point.set_fix(text.trim()))?;
                }
                b"sat" => {
                    let text = read_text_owned(reader, &e)?;
                    point.sat = recover(opts, parse_num("sat", &text))?;
                }
                b"hdop" => {
                    let text = read_text_owned(reader, &e)?;
                    recover(opts, parse_num("hdop", &text).and_then(|v| point.set_hdop(v)))?;
                }
                b"vdop" => {
                    let text = read_text_owned(reader, &e)?;
                    recover(opts, parse_num("vdop", &text).and_then(|v| point.set_vdop(v)))?;
                }
                b"pdop" => {
                    let text = read_text_owned(reader, &e)?;
                    recover(opts, parse_num("pdop", &text).and_then(|v| point.set_pdop(v)))?;
                }
                b"ageofdgpsdata" => {
                    let text = read_text_owned(reader, &e)?;
                    recover(
                        opts,
                        parse_num("ageofdgpsdata", &text).and_then(|v| point.set_ageofdgpsdata(v)),
                    )?;
                }
                b"dgpsid" => {
                    let text = read_text_owned(reader, &e)?;
                    recover(opts, parse_num("dgpsid", &text).and_then(|v| point.set_dgpsid(v)))?;
                }
                _ => {
                    // extensions and GPX 1.0 extras (speed, course, url)
                    reader.read_to_end(e.name())?;
                }
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"link" => {
                if let Some(link) = recover(opts, build_link(&e, None, None))? {
                    point.add_link(link);
                }
            }
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(Some(point))
}

fn build_link(start: &BytesStart<'_>, text: Option<String>, link_type: Option<String>) -> Result<Link> {
    let href = required_attr(start, "link", "href")?;
    let mut link = Link::new(&href)?;
    link.text = text;
    link.link_type = link_type;
    Ok(link)
}

/// Parse a <link> element. Children are always consumed, even when the
/// href is rejected.
fn parse_link(
    start: &BytesStart<'_>,
    reader: &mut XmlReader<'_>,
    opts: &ReadOptions,
) -> Result<Option<Link>> {
    let mut text: Option<String> = None;
    let mut link_type: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"text" => text = Some(read_text_owned(reader, &e)?),
                b"type" => link_type = Some(read_text_owned(reader, &e)?),
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"link" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxError::XmlParse(e)),
            _ => {}
        }
    }

    recover(opts, build_link(start, text, link_type))
}

/// Parse a <rte> element.
fn parse_route(reader: &mut XmlReader<'_>, opts: &ReadOptions) -> Result<Route> {
    let mut route = Route::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"name" => route.name = Some(read_text_owned(reader, &e)?),
                b"cmt" => route.cmt = Some(read_text_owned(reader, &e)?),
                b"desc" => route.desc = Some(read_text_owned(reader, &e)?),
                b"src" => route.src = Some(read_text_owned(reader, &e)?),
                b"type" => route.route_type = Some(read_text_owned(reader, &e)?),
                b"number" => {
                    let text = read_text_owned(reader, &e)?;
                    route.number = recover(opts, parse_num("number", &text))?;
                }
                b"link" => {
                    if let Some(link) = parse_link(&e, reader, opts)? {
                        route.add_link(link);
                    }
                }
                b"rtept" => {
                    if let Some(pt) = parse_point(&e, "rtept", reader, opts)? {
                        route.add_waypoint(pt);
                    }
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"rtept" => {
                    if let Some(pt) = recover(opts, new_point(&e, "rtept"))? {
                        route.add_waypoint(pt);
                    }
                }
                b"link" => {
                    if let Some(link) = recover(opts, build_link(&e, None, None))? {
                        route.add_link(link);
                    }
                }
                _ => {}
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"rte" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(route)
}

/// Parse a <trk> element. Empty segments are kept.
fn parse_track(reader: &mut XmlReader<'_>, opts: &ReadOptions) -> Result<Track> {
    let mut track = Track::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"name" => track.name = Some(read_text_owned(reader, &e)?),
                b"cmt" => track.cmt = Some(read_text_owned(reader, &e)?),
                b"desc" => track.desc = Some(read_text_owned(reader, &e)?),
                b"src" => track.src = Some(read_text_owned(reader, &e)?),
                b"type" => track.track_type = Some(read_text_owned(reader, &e)?),
                b"number" => {
                    let text = read_text_owned(reader, &e)?;
                    track.number = recover(opts, parse_num("number", &text))?;
                }
                b"link" => {
                    if let Some(link) = parse_link(&e, reader, opts)? {
                        track.add_link(link);
                    }
                }
                b"trkseg" => {
                    track.add_track_segment(parse_segment(reader, opts)?);
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"trkseg" => {
                    track.add_track_segment(TrackSegment::new());
                }
                b"link" => {
                    if let Some(link) = recover(opts, build_link(&e, None, None))? {
                        track.add_link(link);
                    }
                }
                _ => {}
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"trk" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(track)
}

/// Parse a <trkseg> element.
fn parse_segment(reader: &mut XmlReader<'_>, opts: &ReadOptions) -> Result<TrackSegment> {
    let mut segment = TrackSegment::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"trkpt" => {
                    if let Some(pt) = parse_point(&e, "trkpt", reader, opts)? {
                        segment.add_waypoint(pt);
                    }
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"trkpt" {
                    if let Some(pt) = recover(opts, new_point(&e, "trkpt"))? {
                        segment.add_waypoint(pt);
                    }
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"trkseg" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(segment)
}

/// Read text content of an element as an owned String.
/// Handles regular text, CDATA sections, and entity references (Event::GeneralRef).
fn read_text_owned(reader: &mut XmlReader<'_>, start: &BytesStart<'_>) -> Result<String> {
    let end_name = start.name().0.to_vec();
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(e)) => {
                text.push_str(std::str::from_utf8(e.as_ref()).unwrap_or_default());
            }
            Ok(Event::CData(e)) => {
                text.push_str(std::str::from_utf8(e.as_ref()).unwrap_or_default());
            }
            Ok(Event::GeneralRef(e)) => {
                if let Ok(Some(ch)) = e.resolve_char_ref() {
                    text.push(ch);
                } else {
                    match std::str::from_utf8(e.as_ref()).unwrap_or_default() {
                        "amp" => text.push('&'),
                        "lt" => text.push('<'),
                        "gt" => text.push('>'),
                        "quot" => text.push('"'),
                        "apos" => text.push('\''),
                        other => log::debug!("dropping unknown entity &{other};"),
                    }
                }
            }
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(text)
}
