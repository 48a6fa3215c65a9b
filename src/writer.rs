use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::Result;
use crate::model::*;
use crate::options::WriteOptions;

const GPX_NAMESPACE: &str = "http://www.topografix.com/GPX/1/1";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str =
    "http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd";

/// Serialize a document as GPX 1.1 XML with default options.
pub fn write_gpx(gpx: &Gpx) -> Result<String> {
    write_gpx_with(gpx, &WriteOptions::default())
}

/// Serialize a document as GPX 1.1 XML.
///
/// The root keeps the document's own `version` so the output reads back as
/// an equal document. Elements follow the 1.1 schema order. Absent fields are omitted, lists are
/// written in stored order.
pub fn write_gpx_with(gpx: &Gpx, opts: &WriteOptions) -> Result<String> {
    let xml = if opts.indent > 0 {
        Writer::new_with_indent(Vec::new(), b' ', opts.indent)
    } else {
        Writer::new(Vec::new())
    };
    let mut out = GpxWriter { xml };

    out.xml
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    out.document(gpx)?;

    Ok(String::from_utf8(out.xml.into_inner())?)
}

struct GpxWriter {
    xml: Writer<Vec<u8>>,
}

impl GpxWriter {
    fn document(&mut self, gpx: &Gpx) -> Result<()> {
        let mut root = BytesStart::new("gpx");
        root.push_attribute(("xmlns", GPX_NAMESPACE));
        root.push_attribute(("xmlns:xsi", XSI_NAMESPACE));
        root.push_attribute(("xsi:schemaLocation", SCHEMA_LOCATION));
        root.push_attribute(("version", gpx.version()));
        root.push_attribute(("creator", gpx.creator()));
        self.xml.write_event(Event::Start(root))?;

        if let Some(metadata) = gpx.metadata() {
            self.metadata(metadata)?;
        }
        for wpt in gpx.waypoints() {
            self.point("wpt", wpt)?;
        }
        for rte in gpx.routes() {
            self.route(rte)?;
        }
        for trk in gpx.tracks() {
            self.track(trk)?;
        }

        self.end("gpx")
    }

    fn metadata(&mut self, metadata: &Metadata) -> Result<()> {
        self.start("metadata")?;
        self.opt_text("name", metadata.name.as_deref())?;
        self.opt_text("desc", metadata.desc.as_deref())?;
        if let Some(author) = &metadata.author {
            self.person("author", author)?;
        }
        if let Some(copyright) = &metadata.copyright {
            self.copyright(copyright)?;
        }
        self.links(metadata.links())?;
        self.opt_time("time", metadata.time.as_ref())?;
        self.opt_text("keywords", metadata.keywords.as_deref())?;
        if let Some(bounds) = &metadata.bounds {
            let mut tag = BytesStart::new("bounds");
            tag.push_attribute(("minlat", bounds.minlat().to_string().as_str()));
            tag.push_attribute(("minlon", bounds.minlon().to_string().as_str()));
            tag.push_attribute(("maxlat", bounds.maxlat().to_string().as_str()));
            tag.push_attribute(("maxlon", bounds.maxlon().to_string().as_str()));
            self.xml.write_event(Event::Empty(tag))?;
        }
        self.end("metadata")
    }

    fn person(&mut self, element: &str, person: &Person) -> Result<()> {
        self.start(element)?;
        self.opt_text("name", person.name.as_deref())?;
        if let Some(email) = &person.email {
            let mut tag = BytesStart::new("email");
            tag.push_attribute(("id", email.id()));
            tag.push_attribute(("domain", email.domain()));
            self.xml.write_event(Event::Empty(tag))?;
        }
        if let Some(link) = &person.link {
            self.link(link)?;
        }
        self.end(element)
    }

    fn copyright(&mut self, copyright: &Copyright) -> Result<()> {
        let mut tag = BytesStart::new("copyright");
        tag.push_attribute(("author", copyright.author()));
        self.xml.write_event(Event::Start(tag))?;
        self.opt_display("year", copyright.year())?;
        self.opt_text("license", copyright.license())?;
        self.end("copyright")
    }

    fn links(&mut self, links: &[Link]) -> Result<()> {
        for link in links {
            self.link(link)?;
        }
        Ok(())
    }

    fn link(&mut self, link: &Link) -> Result<()> {
        let mut tag = BytesStart::new("link");
        tag.push_attribute(("href", link.href()));
        if link.text.is_none() && link.link_type.is_none() {
            self.xml.write_event(Event::Empty(tag))?;
            return Ok(());
        }
        self.xml.write_event(Event::Start(tag))?;
        self.opt_text("text", link.text.as_deref())?;
        self.opt_text("type", link.link_type.as_deref())?;
        self.end("link")
    }

    fn point(&mut self, element: &str, pt: &Waypoint) -> Result<()> {
        let mut tag = BytesStart::new(element);
        tag.push_attribute(("lat", pt.lat().to_string().as_str()));
        tag.push_attribute(("lon", pt.lon().to_string().as_str()));
        self.xml.write_event(Event::Start(tag))?;

        self.opt_display("ele", pt.ele)?;
        self.opt_time("time", pt.time.as_ref())?;
        self.opt_display("magvar", pt.magvar())?;
        self.opt_display("geoidheight", pt.geoidheight)?;
        self.opt_text("name", pt.name.as_deref())?;
        self.opt_text("cmt", pt.cmt.as_deref())?;
        self.opt_text("desc", pt.desc.as_deref())?;
        self.opt_text("src", pt.src.as_deref())?;
        self.links(pt.links())?;
        self.opt_text("sym", pt.sym.as_deref())?;
        self.opt_text("type", pt.point_type.as_deref())?;
        self.opt_display("fix", pt.fix())?;
        self.opt_display("sat", pt.sat)?;
        self.opt_display("hdop", pt.hdop())?;
        self.opt_display("vdop", pt.vdop())?;
        self.opt_display("pdop", pt.pdop())?;
        self.opt_display("ageofdgpsdata", pt.ageofdgpsdata())?;
        self.opt_display("dgpsid", pt.dgpsid())?;

        self.end(element)
    }

    fn route(&mut self, rte: &Route) -> Result<()> {
        self.start("rte")?;
        self.opt_text("name", rte.name.as_deref())?;
        self.opt_text("cmt", rte.cmt.as_deref())?;
        self.opt_text("desc", rte.desc.as_deref())?;
        self.opt_text("src", rte.src.as_deref())?;
        self.links(rte.links())?;
        self.opt_display("number", rte.number)?;
        self.opt_text("type", rte.route_type.as_deref())?;
        for pt in rte.points() {
            self.point("rtept", pt)?;
        }
        self.end("rte")
    }

    fn track(&mut self, trk: &Track) -> Result<()> {
        self.start("trk")?;
        self.opt_text("name", trk.name.as_deref())?;
        self.opt_text("cmt", trk.cmt.as_deref())?;
        self.opt_text("desc", trk.desc.as_deref())?;
        self.opt_text("src", trk.src.as_deref())?;
        self.links(trk.links())?;
        self.opt_display("number", trk.number)?;
        self.opt_text("type", trk.track_type.as_deref())?;
        for seg in trk.segments() {
            if seg.is_empty() {
                self.xml.write_event(Event::Empty(BytesStart::new("trkseg")))?;
                continue;
            }
            self.start("trkseg")?;
            for pt in seg.points() {
                self.point("trkpt", pt)?;
            }
            self.end("trkseg")?;
        }
        self.end("trk")
    }

    fn start(&mut self, element: &str) -> Result<()> {
        self.xml.write_event(Event::Start(BytesStart::new(element)))?;
        Ok(())
    }

    fn end(&mut self, element: &str) -> Result<()> {
        self.xml.write_event(Event::End(BytesEnd::new(element)))?;
        Ok(())
    }

    fn text(&mut self, element: &str, value: &str) -> Result<()> {
        self.start(element)?;
        self.xml.write_event(Event::Text(BytesText::new(value)))?;
        self.end(element)
    }

    fn opt_text(&mut self, element: &str, value: Option<&str>) -> Result<()> {
        match value {
            Some(v) => self.text(element, v),
            None => Ok(()),
        }
    }

    fn opt_display<T: std::fmt::Display>(&mut self, element: &str, value: Option<T>) -> Result<()> {
        match value {
            Some(v) => self.text(element, &v.to_string()),
            None => Ok(()),
        }
    }

    fn opt_time(&mut self, element: &str, value: Option<&DateTime<Utc>>) -> Result<()> {
        match value {
            Some(t) => self.text(element, &t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => Ok(()),
        }
    }
}
