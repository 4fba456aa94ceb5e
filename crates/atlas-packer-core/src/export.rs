use crate::config::PackerConfig;
use crate::model::Entry;
use crate::pipeline::PackOutput;
use serde_json::{json, Value};

fn entry_fields(e: &Entry) -> Value {
    let (ox, oy) = e.draw_offset();
    json!({
        "frame": {"x": e.packed.x, "y": e.packed.y, "w": e.packed.w, "h": e.packed.h},
        "trimmed": e.trimmed(),
        "spriteSourceSize": {"x": ox, "y": oy, "w": e.packed.w, "h": e.packed.h},
        "sourceSize": {"w": e.frame.w, "h": e.frame.h},
    })
}

fn meta(cfg: &PackerConfig) -> Value {
    json!({
        "schema_version": "1",
        "app": "atlas-packer",
        "version": env!("CARGO_PKG_VERSION"),
        "format": "RGBA8888",
        "config": cfg,
    })
}

/// Serialize the output as a JSON object `{ pages, meta }` (array-of-pages style).
/// Each page lists its entries, duplicates included.
pub fn to_json_array(out: &PackOutput, cfg: &PackerConfig) -> Value {
    let pages_val = out
        .pages
        .iter()
        .map(|p| {
            let entries: Vec<Value> = out
                .entries_on(p.id)
                .map(|e| {
                    let mut v = entry_fields(e);
                    v["id"] = json!(e.id);
                    v["key"] = json!(e.name);
                    v
                })
                .collect();
            json!({
                "id": p.id,
                "width": p.width,
                "height": p.height,
                "frames": entries,
            })
        })
        .collect::<Vec<_>>();
    json!({"pages": pages_val, "meta": meta(cfg)})
}

/// Flatten entries keyed by name, include page id/size hints.
/// Shape: `{ frames: { name: { frame, trimmed, spriteSourceSize, sourceSize, page, pageSize } }, meta }`.
/// When several sources share a name the first submitted one wins.
pub fn to_json_hash(out: &PackOutput, cfg: &PackerConfig) -> Value {
    let mut ordered: Vec<&Entry> = out.entries.iter().collect();
    ordered.sort_by_key(|e| e.id);
    let mut frames = serde_json::Map::new();
    for e in ordered {
        if frames.contains_key(&e.name) {
            continue;
        }
        let Some(page) = out.pages.get(e.page) else {
            continue;
        };
        let mut v = entry_fields(e);
        v["page"] = json!(page.id);
        v["pageSize"] = json!({"w": page.width, "h": page.height});
        frames.insert(e.name.clone(), v);
    }
    json!({ "frames": frames, "meta": meta(cfg) })
}
