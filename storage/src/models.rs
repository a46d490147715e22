use bson::{Binary, oid::ObjectId, spec::BinarySubtype};
use empire_core::config::{BeachParams, ForestParams, HeightParams};
use empire_core::{GeneratedMap, Grid, MapConfig, MapResult, Seed, TerrainGrid};
use serde::{Deserialize, Serialize};

// Generation parameters stored next to the map so it can be regenerated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapParams {
    pub width: u32,
    pub height: u32,
    pub terrain: HeightParams,
    pub beach: BeachParams,
    pub forest: ForestParams,
}

impl MapParams {
    pub fn from_config(config: &MapConfig) -> Self {
        Self {
            width: config.width as u32,
            height: config.height as u32,
            terrain: config.terrain.clone(),
            beach: config.beach.clone(),
            forest: config.forest.clone(),
        }
    }

    pub fn to_config(&self, seed: &str) -> MapConfig {
        MapConfig {
            width: self.width as usize,
            height: self.height as usize,
            seed: Some(seed.to_string()),
            terrain: self.terrain.clone(),
            beach: self.beach.clone(),
            forest: self.forest.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ObjectId>,
    pub name: String,
    pub seed: String,
    pub params: MapParams,
    // Row-major heights, 4 little-endian bytes each. Binary rather than a
    // BSON array keeps a 1024×1024 map well under the document limit.
    pub height_map: Binary,
    // One terrain code per cell, same layout as height_map
    pub terrain: Binary,
}

impl MapDoc {
    pub fn from_generated(name: &str, config: &MapConfig, map: &GeneratedMap) -> Self {
        let mut params = MapParams::from_config(config);
        params.width = map.width() as u32;
        params.height = map.height() as u32;
        Self {
            id: None,
            name: name.to_string(),
            seed: map.seed.as_str().to_string(),
            params,
            height_map: binary(encode_heights(map.height_field.as_slice())),
            terrain: binary(map.terrain_data()),
        }
    }

    // Rebuild the grids; fails on truncated arrays or unknown terrain codes
    pub fn into_generated(self) -> MapResult<GeneratedMap> {
        let w = self.params.width as usize;
        let h = self.params.height as usize;
        let height_field = Grid::from_vec(w, h, decode_heights(&self.height_map.bytes))?;
        let terrain_grid = TerrainGrid::from_codes(w, h, &self.terrain.bytes)?;
        Ok(GeneratedMap {
            seed: Seed::new(self.seed),
            height_field,
            terrain_grid,
        })
    }
}

fn binary(bytes: Vec<u8>) -> Binary {
    Binary {
        subtype: BinarySubtype::Generic,
        bytes,
    }
}

fn encode_heights(heights: &[f32]) -> Vec<u8> {
    heights.iter().flat_map(|h| h.to_le_bytes()).collect()
}

// A trailing partial value is dropped; the grid length check reports it
fn decode_heights(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use empire_core::MapGenerator;

    fn sample_doc() -> (MapConfig, GeneratedMap, MapDoc) {
        let config = MapConfig::new(24, 16).with_seed("doc");
        let map = MapGenerator::new(config.clone()).unwrap().generate();
        let doc = MapDoc::from_generated("islands", &config, &map);
        (config, map, doc)
    }

    #[test]
    fn doc_rebuilds_the_same_map() {
        let (_, map, doc) = sample_doc();
        assert_eq!(doc.height_map.bytes.len(), 24 * 16 * 4);
        assert_eq!(doc.terrain.bytes.len(), 24 * 16);
        assert_eq!(doc.into_generated().unwrap(), map);
    }

    #[test]
    fn doc_params_regenerate() {
        let (config, map, doc) = sample_doc();
        let regen_config = doc.params.to_config(&doc.seed);
        assert_eq!(regen_config, config);
        let regen = MapGenerator::new(regen_config).unwrap().generate();
        assert_eq!(regen, map);
    }

    #[test]
    fn doc_rejects_corrupt_terrain() {
        let (_, _, mut doc) = sample_doc();
        doc.terrain.bytes[3] = 42;
        assert!(doc.into_generated().is_err());

        let (_, _, mut doc) = sample_doc();
        doc.height_map.bytes.pop();
        assert!(doc.into_generated().is_err());
    }

    #[test]
    fn doc_serializes_to_bson() {
        let (_, _, doc) = sample_doc();
        let bson_doc = bson::to_document(&doc).unwrap();
        assert_eq!(bson_doc.get_str("name").unwrap(), "islands");
        assert!(!bson_doc.contains_key("_id"));
        assert!(bson_doc.get_binary_generic("height_map").is_ok());
        assert!(bson_doc.get_binary_generic("terrain").is_ok());
        let back: MapDoc = bson::from_document(bson_doc).unwrap();
        assert_eq!(back.terrain, doc.terrain);
        assert_eq!(back.params, doc.params);
    }
}
