//! Visio 2013+ (`.vsdx`) part templates.
//!
//! The document, masters, windows and metadata parts are static apart from
//! the relationship ids and titles passed in; only the page part depends on
//! the diagram content.

use chrono::{DateTime, SecondsFormat, Utc};

use super::xml::{num, Element};
use crate::models::{Edge, Shape, Size};

pub const NS_VISIO: &str = "http://schemas.microsoft.com/office/visio/2012/main";
pub const NS_OFFICE_RELS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_EXTENDED_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties";
const NS_DOC_PROPS_VTYPES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes";
const NS_CORE_PROPS: &str =
    "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";

/// Master sheet ids as declared in the document's master catalogue.
pub const RECTANGLE_MASTER: u32 = 0;
pub const CONNECTOR_MASTER: u32 = 1;
/// Id of the single shape inside each master part.
const RECTANGLE_MASTER_SHAPE: u32 = 5;
const CONNECTOR_MASTER_SHAPE: u32 = 6;

const CONNECTOR_LINE_WEIGHT: f64 = 0.02;
const ARROW_END: u32 = 2;
const OBJ_TYPE_CONNECTOR: u32 = 2;

/// Document color table. Indices 8 and up are the node style colors.
pub const PALETTE: &[(u32, &str)] = &[
    (0, "#000000"),
    (1, "#FFFFFF"),
    (2, "#FF0000"),
    (3, "#00FF00"),
    (4, "#0000FF"),
    (5, "#FFFF00"),
    (6, "#FF00FF"),
    (7, "#00FFFF"),
    (8, "#4472C4"),
    (9, "#70AD47"),
    (10, "#FFC000"),
    (11, "#FFE699"),
    (12, "#BDD7EE"),
    (13, "#F8CBAD"),
];

const SNAP_ANGLES: &str = "0.0,0.261799387799149,0.523598775598299,0.785398163397448,\
1.04719755119660,1.30899693899575,1.57079632679490,1.83259571459405,2.09439510239320,\
2.35619449019234,2.61799387799149,2.87979326579064";

/// Relationship ids the document part uses to address its targets.
#[derive(Debug, Clone)]
pub struct DocumentRefs {
    pub page: String,
    pub rectangle_master: String,
    pub connector_master: String,
}

fn cell(name: &str, value: impl ToString) -> Element {
    Element::new("Cell").attr("N", name).attr("V", value)
}

fn inches(name: &str, value: f64) -> Element {
    cell(name, num(value)).attr("U", "IN")
}

fn formula_cell(name: &str, value: f64, formula: &str) -> Element {
    cell(name, num(value)).attr("F", formula)
}

fn sheet_cells(width: f64, height: f64) -> Vec<Element> {
    vec![
        inches("PageWidth", width),
        inches("PageHeight", height),
        inches("PageScale", 1.0),
        inches("DrawingScale", 1.0),
    ]
}

fn transform_cells(center_x: f64, center_y: f64, width: f64, height: f64) -> Vec<Element> {
    vec![
        inches("PinX", center_x),
        inches("PinY", center_y),
        inches("Width", width),
        inches("Height", height),
        inches("LocPinX", width / 2.0),
        inches("LocPinY", height / 2.0),
    ]
}

/// `/visio/document.xml`: settings, colors, fonts, styles, masters and pages.
pub fn document(refs: &DocumentRefs, page_name: &str) -> Element {
    let settings = Element::new("DocumentSettings").children([
        Element::new("GlueSettings").text("9"),
        Element::new("SnapSettings").text("65847"),
        Element::new("SnapExtensions").text("34"),
        Element::new("SnapAngles").text(SNAP_ANGLES),
        Element::new("DynamicGridEnabled").text("1"),
        Element::new("ProtectStyles").text("0"),
        Element::new("ProtectShapes").text("0"),
        Element::new("ProtectMasters").text("0"),
        Element::new("ProtectBkgnds").text("0"),
    ]);

    let colors = Element::new("Colors").children(
        PALETTE
            .iter()
            .map(|(ix, rgb)| Element::new("ColorEntry").attr("IX", ix).attr("RGB", rgb)),
    );

    let fonts = Element::new("FaceNames").children([
        Element::new("FaceName")
            .attr("ID", 0)
            .attr("Name", "Arial")
            .attr("UnicodeRanges", "31367 -2147483648 8 0")
            .attr("CharSets", "536870145 0")
            .attr("Panos", "2 11 6 4 2 2 2 2 2 4")
            .attr("Flags", 325),
        Element::new("FaceName")
            .attr("ID", 1)
            .attr("Name", "Arial Unicode MS")
            .attr("UnicodeRanges", "-1 -1 -1 -1")
            .attr("CharSets", "1073741824 0")
            .attr("Panos", "2 11 6 4 2 2 2 2 2 4")
            .attr("Flags", 325),
    ]);

    let normal = Element::new("StyleSheet")
        .attr("ID", 0)
        .attr("Name", "Normal")
        .attr("NameU", "Normal")
        .children([
            cell("EnableLineProps", 1),
            cell("EnableFillProps", 1),
            cell("EnableTextProps", 1),
            cell("HideForApply", 0),
        ])
        .child(Element::new("Line").children([
            cell("LineWeight", 0.01),
            cell("LineColor", 0),
            cell("LinePattern", 1),
        ]))
        .child(Element::new("Fill").children([
            cell("FillForegnd", 1),
            cell("FillBkgnd", 0),
            cell("FillPattern", 1),
        ]))
        .child(char_section(1, "0.1666666666666667"));

    let connector = Element::new("StyleSheet")
        .attr("ID", 1)
        .attr("Name", "Connector")
        .attr("NameU", "Connector")
        .children([
            cell("EnableLineProps", 1),
            cell("EnableFillProps", 0),
            cell("EnableTextProps", 1),
            cell("HideForApply", 0),
        ])
        .child(Element::new("Line").children([
            cell("LineWeight", num(CONNECTOR_LINE_WEIGHT)),
            cell("LineColor", 0),
            cell("LinePattern", 1),
            cell("EndArrow", ARROW_END),
            cell("BeginArrow", 0),
        ]))
        .child(char_section(0, "0.125"));

    let masters = Element::new("Masters").children([
        Element::new("Master")
            .attr("ID", RECTANGLE_MASTER)
            .attr("Name", "Rectangle")
            .attr("NameU", "Rectangle")
            .attr("r:id", &refs.rectangle_master),
        Element::new("Master")
            .attr("ID", CONNECTOR_MASTER)
            .attr("Name", "Dynamic Connector")
            .attr("NameU", "Dynamic Connector")
            .attr("r:id", &refs.connector_master),
    ]);

    let pages = Element::new("Pages").child(
        Element::new("Page")
            .attr("ID", 0)
            .attr("Name", page_name)
            .attr("NameU", page_name)
            .attr("r:id", &refs.page),
    );

    Element::new("VisioDocument")
        .attr("xmlns", NS_VISIO)
        .attr("xmlns:r", NS_OFFICE_RELS)
        .child(settings)
        .child(colors)
        .child(fonts)
        .child(Element::new("StyleSheets").children([normal, connector]))
        .child(masters)
        .child(pages)
}

fn char_section(font: u32, size: &str) -> Element {
    Element::new("Char").children([
        cell("Font", font),
        cell("Color", 0),
        cell("Style", 0),
        cell("Case", 0),
        cell("Pos", 0),
        cell("FontScale", 1),
        cell("Size", size),
    ])
}

/// `/visio/pages/page1.xml`: node shapes, then connectors, then glue.
pub fn page(shapes: &[Shape], edges: &[Edge], page_size: Size) -> Element {
    let page_sheet = Element::new("PageSheet")
        .children(sheet_cells(page_size.width, page_size.height))
        .children([cell("ShdwObliqueAngle", 0), cell("ShdwScaleFactor", 1)]);

    let mut shape_list = Element::new("Shapes");
    for shape in shapes {
        shape_list.push(node_shape(shape));
    }
    for edge in edges {
        shape_list.push(connector_shape(edge));
    }

    let mut contents = Element::new("PageContents")
        .attr("xmlns", NS_VISIO)
        .attr("xmlns:r", NS_OFFICE_RELS)
        .attr("xml:space", "preserve")
        .child(page_sheet)
        .child(shape_list);

    if !edges.is_empty() {
        contents.push(Element::new("Connects").children(edges.iter().flat_map(glue)));
    }
    contents
}

fn node_shape(shape: &Shape) -> Element {
    Element::new("Shape")
        .attr("ID", shape.id)
        .attr("Type", "Shape")
        .attr("Master", RECTANGLE_MASTER)
        .attr("MasterShape", RECTANGLE_MASTER_SHAPE)
        .attr("LineStyle", 0)
        .attr("FillStyle", 0)
        .attr("TextStyle", 0)
        .children(transform_cells(
            shape.center.x,
            shape.center.y,
            shape.size.width,
            shape.size.height,
        ))
        .children([
            cell("FillForegnd", shape.style.color_index()),
            cell("FillPattern", 1),
        ])
        .child(Element::new("Text").text(shape.text.as_str()))
}

fn connector_shape(edge: &Edge) -> Element {
    let bounds = edge.bounds();
    Element::new("Shape")
        .attr("ID", edge.id)
        .attr("Type", "Shape")
        .attr("Master", CONNECTOR_MASTER)
        .attr("MasterShape", CONNECTOR_MASTER_SHAPE)
        .attr("LineStyle", 1)
        .attr("FillStyle", 0)
        .attr("TextStyle", 0)
        .children(transform_cells(
            bounds.center.x,
            bounds.center.y,
            bounds.size.width,
            bounds.size.height,
        ))
        .children([
            inches("BeginX", edge.start.x),
            inches("BeginY", edge.start.y),
            inches("EndX", edge.end.x),
            inches("EndY", edge.end.y),
            cell("LineWeight", num(CONNECTOR_LINE_WEIGHT)),
            cell("EndArrow", ARROW_END),
            cell("ObjType", OBJ_TYPE_CONNECTOR),
        ])
}

/// Glue a connector's begin to its source shape and its end to its target.
fn glue(edge: &Edge) -> [Element; 2] {
    let connect = |from_cell: &str, to_sheet: u32| {
        Element::new("Connect")
            .attr("FromSheet", edge.id)
            .attr("FromCell", from_cell)
            .attr("ToSheet", to_sheet)
            .attr("ToCell", "PinX")
    };
    [connect("BeginX", edge.from), connect("EndX", edge.to)]
}

/// `/visio/masters/master1.xml`: a unit rectangle scaled by its instances.
pub fn rectangle_master() -> Element {
    let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)];
    let rows = corners.iter().enumerate().map(|(i, (x, y))| {
        geometry_row(if i == 0 { "MoveTo" } else { "LineTo" }, i + 1, *x, *y, 2.0, 1.0)
    });

    let shape = Element::new("Shape")
        .attr("ID", RECTANGLE_MASTER_SHAPE)
        .attr("Type", "Shape")
        .attr("LineStyle", 0)
        .attr("FillStyle", 0)
        .attr("TextStyle", 0)
        .children(transform_cells(1.0, 0.5, 2.0, 1.0))
        .child(
            Element::new("Section")
                .attr("N", "Geometry")
                .attr("IX", 0)
                .children(rows),
        )
        .children([cell("FillForegnd", 1), cell("FillPattern", 1)]);

    master_contents(2.0, 1.0, shape)
}

/// `/visio/masters/master2.xml`: a straight line from corner to corner.
pub fn connector_master() -> Element {
    let shape = Element::new("Shape")
        .attr("ID", CONNECTOR_MASTER_SHAPE)
        .attr("Type", "Shape")
        .attr("LineStyle", 1)
        .attr("FillStyle", 0)
        .attr("TextStyle", 0)
        .children(transform_cells(0.5, 0.5, 1.0, 1.0))
        .child(cell("ObjType", OBJ_TYPE_CONNECTOR))
        .child(
            Element::new("Section")
                .attr("N", "Geometry")
                .attr("IX", 0)
                .children([
                    geometry_row("MoveTo", 1, 0.0, 0.0, 1.0, 1.0),
                    geometry_row("LineTo", 2, 1.0, 1.0, 1.0, 1.0),
                ]),
        );

    master_contents(1.0, 1.0, shape)
}

/// One geometry row. `fx`/`fy` are fractions of the shape's width/height;
/// `width`/`height` are the master's nominal size used for the cached value.
fn geometry_row(kind: &str, ix: usize, fx: f64, fy: f64, width: f64, height: f64) -> Element {
    Element::new("Row").attr("T", kind).attr("IX", ix).children([
        formula_cell("X", fx * width, &format!("Width*{}", num(fx))),
        formula_cell("Y", fy * height, &format!("Height*{}", num(fy))),
    ])
}

fn master_contents(width: f64, height: f64, shape: Element) -> Element {
    Element::new("MasterContents")
        .attr("xmlns", NS_VISIO)
        .attr("xmlns:r", NS_OFFICE_RELS)
        .attr("xml:space", "preserve")
        .child(Element::new("MasterSheet").children(sheet_cells(width, height)))
        .child(Element::new("Shapes").child(shape))
}

/// `/visio/windows.xml`: one drawing window centered on the page.
pub fn windows(page_size: Size) -> Element {
    Element::new("Windows").attr("xmlns", NS_VISIO).child(
        Element::new("Window")
            .attr("ID", 0)
            .attr("WindowType", "Drawing")
            .attr("WindowState", 1073741824u32)
            .attr("ViewScale", 1)
            .attr("ViewCenterX", num(page_size.width / 2.0))
            .attr("ViewCenterY", num(page_size.height / 2.0))
            .children([
                Element::new("ShowRulers").text("1"),
                Element::new("ShowGrid").text("1"),
                Element::new("ShowPageBreaks").text("0"),
                Element::new("ShowGuides").text("1"),
                Element::new("ShowConnectionPoints").text("1"),
            ]),
    )
}

/// `/docProps/app.xml`.
pub fn app_properties(application: &str) -> Element {
    Element::new("Properties")
        .attr("xmlns", NS_EXTENDED_PROPS)
        .attr("xmlns:vt", NS_DOC_PROPS_VTYPES)
        .children([
            Element::new("Application").text(application),
            Element::new("DocSecurity").text("0"),
            Element::new("ScaleCrop").text("false"),
            Element::new("SharedDoc").text("false"),
            Element::new("HyperlinksChanged").text("false"),
            Element::new("AppVersion").text("16.0000"),
        ])
}

/// `/docProps/core.xml`.
pub fn core_properties(title: &str, creator: &str, created: DateTime<Utc>) -> Element {
    let stamp = created.to_rfc3339_opts(SecondsFormat::Secs, true);
    Element::new("cp:coreProperties")
        .attr("xmlns:cp", NS_CORE_PROPS)
        .attr("xmlns:dc", "http://purl.org/dc/elements/1.1/")
        .attr("xmlns:dcterms", "http://purl.org/dc/terms/")
        .attr("xmlns:dcmitype", "http://purl.org/dc/dcmitype/")
        .attr("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance")
        .children([
            Element::new("dc:title").text(title),
            Element::new("dc:creator").text(creator),
            Element::new("dcterms:created")
                .attr("xsi:type", "dcterms:W3CDTF")
                .text(stamp.as_str()),
            Element::new("dcterms:modified")
                .attr("xsi:type", "dcterms:W3CDTF")
                .text(stamp.as_str()),
        ])
}
