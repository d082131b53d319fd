//! Join of geometry and attribute maps into feature collections

use indexmap::IndexMap;
use tracing::debug;

use crate::constants::RECORD_ID_PROPERTY;
use crate::models::{
    Feature, FeatureCollection, Geometry, LayerMap, LayerName, PropertyMap, PropertyValue,
};

/// Join geometries with their attributes by (layer, record id).
///
/// Geometry drives the iteration: every stored geometry yields one feature,
/// records without attributes get an empty property set, and layers that
/// only exist in `attributes` are not emitted. Each feature's properties
/// carry an injected `record_id`.
pub fn merge(
    geometry: &LayerMap<Geometry>,
    attributes: &LayerMap<PropertyMap>,
) -> IndexMap<LayerName, FeatureCollection> {
    let mut layers = IndexMap::with_capacity(geometry.len());

    for (layer, records) in geometry {
        let layer_attributes = attributes.get(layer);
        let mut collection = FeatureCollection::new();
        let mut without_attributes = 0usize;

        for (record_id, shape) in records {
            let mut properties = match layer_attributes.and_then(|map| map.get(record_id)) {
                Some(found) => found.clone(),
                None => {
                    without_attributes += 1;
                    PropertyMap::new()
                }
            };
            properties.insert(
                RECORD_ID_PROPERTY.to_string(),
                PropertyValue::String(record_id.clone()),
            );

            collection.push(Feature {
                record_id: record_id.clone(),
                geometry: shape.clone(),
                properties,
            });
        }

        debug!(
            "Merged layer {}: {} features, {} without attributes",
            layer,
            collection.len(),
            without_attributes
        );
        layers.insert(layer.clone(), collection);
    }

    layers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;

    fn geometry_map(entries: &[(&str, &str, Geometry)]) -> LayerMap<Geometry> {
        let mut map = LayerMap::new();
        for (layer, record, shape) in entries {
            map.entry(layer.to_string())
                .or_insert_with(IndexMap::new)
                .insert(record.to_string(), shape.clone());
        }
        map
    }

    fn properties(pairs: &[(&str, PropertyValue)]) -> PropertyMap {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_merge_injects_record_id() {
        let geometry = geometry_map(&[("PARCEL", "7", Geometry::Point(Point::new(1.0, 2.0)))]);
        let mut attributes = LayerMap::new();
        attributes.insert(
            "PARCEL".to_string(),
            IndexMap::from([(
                "7".to_string(),
                properties(&[("PNU", PropertyValue::String("111".to_string()))]),
            )]),
        );

        let merged = merge(&geometry, &attributes);

        let feature = &merged["PARCEL"].features[0];
        assert_eq!(merged["PARCEL"].len(), 1);
        assert_eq!(feature.record_id, "7");
        assert_eq!(feature.properties["PNU"], PropertyValue::String("111".to_string()));
        assert_eq!(
            feature.properties[RECORD_ID_PROPERTY],
            PropertyValue::String("7".to_string())
        );
    }

    #[test]
    fn test_missing_attributes_give_record_id_only() {
        let geometry = geometry_map(&[
            ("L", "1", Geometry::Point(Point::new(0.0, 0.0))),
            ("L", "2", Geometry::Point(Point::new(1.0, 1.0))),
        ]);

        let merged = merge(&geometry, &LayerMap::new());

        let ids: Vec<&str> = merged["L"].iter().map(|f| f.record_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        for feature in merged["L"].iter() {
            assert_eq!(feature.properties.len(), 1);
        }
    }

    #[test]
    fn test_attribute_only_layers_are_not_emitted() {
        let geometry = geometry_map(&[("G", "1", Geometry::Point(Point::new(0.0, 0.0)))]);
        let mut attributes = LayerMap::new();
        attributes.insert(
            "ONLY_ATTRIBUTES".to_string(),
            IndexMap::from([("1".to_string(), properties(&[("A", PropertyValue::Integer(1))]))]),
        );

        let merged = merge(&geometry, &attributes);

        assert_eq!(merged.len(), 1);
        assert!(merged.contains_key("G"));
    }

    #[test]
    fn test_empty_geometry_layer_is_kept() {
        let mut geometry = LayerMap::new();
        geometry.insert("EMPTY".to_string(), IndexMap::new());

        let merged = merge(&geometry, &LayerMap::new());

        assert!(merged["EMPTY"].is_empty());
    }
}
