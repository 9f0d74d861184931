//! XML recipe files.
//!
//! ```xml
//! <recipes>
//!     <cake>
//!         <name>Red Velvet Strawberry Cake</name>
//!         <stovetime>40 min</stovetime>
//!         <ingredients>
//!             <item>
//!                 <itemname>Flour</itemname>
//!                 <itemcount>3</itemcount>
//!                 <itemunit>cups</itemunit>
//!             </item>
//!         </ingredients>
//!     </cake>
//! </recipes>
//! ```

use crate::domain::model::{Ingredient, Recipe, RecipeCollection};
use crate::utils::error::{EtlError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename = "recipes")]
pub struct XmlRecipes {
    #[serde(rename = "cake")]
    pub cakes: Vec<XmlCake>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct XmlCake {
    pub name: String,
    #[serde(rename = "stovetime")]
    pub stove_time: String,
    #[serde(skip_serializing_if = "XmlIngredients::is_empty")]
    pub ingredients: XmlIngredients,
}

/// The `<ingredients>` wrapper around the `<item>` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct XmlIngredients {
    #[serde(rename = "item")]
    pub items: Vec<XmlItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct XmlItem {
    #[serde(rename = "itemname")]
    pub item_name: String,
    #[serde(rename = "itemcount")]
    pub item_count: String,
    #[serde(rename = "itemunit", skip_serializing_if = "String::is_empty")]
    pub item_unit: String,
}

impl XmlIngredients {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// 解析 XML 文字，`path` 只用於錯誤訊息
///
/// Text values are kept exactly as written, surrounding whitespace included.
/// Unknown elements are skipped, so `<cake>` and `<item>` entries do not have
/// to be adjacent. The root element must be `<recipes>`.
pub fn from_xml_str(path: &str, text: &str) -> Result<XmlRecipes> {
    let mut reader = Reader::from_str(text);
    // <x/> 視為 <x></x>，結束標籤一律成對出現
    reader.config_mut().expand_empty_elements = true;

    RecipesReader { reader, path }.document()
}

struct RecipesReader<'a> {
    reader: Reader<&'a [u8]>,
    path: &'a str,
}

impl<'a> RecipesReader<'a> {
    fn fail(&self, message: impl fmt::Display) -> EtlError {
        EtlError::XmlError {
            path: self.path.to_string(),
            message: message.to_string(),
        }
    }

    fn next(&mut self) -> Result<Event<'a>> {
        let position = self.reader.buffer_position();
        self.reader
            .read_event()
            .map_err(|e| self.fail(format!("{} (at byte {})", e, position)))
    }

    fn unexpected_eof(&self) -> EtlError {
        self.fail("unexpected end of document")
    }

    fn skip(&mut self, start: &BytesStart<'_>) -> Result<()> {
        let end = start.to_end().into_owned();
        self.reader
            .read_to_end(end.name())
            .map_err(|e| self.fail(e))?;
        Ok(())
    }

    fn document(mut self) -> Result<XmlRecipes> {
        loop {
            match self.next()? {
                Event::Start(e) => {
                    if e.local_name().as_ref() != b"recipes" {
                        return Err(self.fail(format!(
                            "expected element type <recipes> but have <{}>",
                            String::from_utf8_lossy(e.local_name().as_ref())
                        )));
                    }
                    return self.recipes();
                }
                Event::Eof => return Err(self.fail("no <recipes> element found")),
                // 宣告、註解與根元素前的空白
                _ => {}
            }
        }
    }

    fn recipes(&mut self) -> Result<XmlRecipes> {
        let mut recipes = XmlRecipes::default();
        loop {
            match self.next()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"cake" => recipes.cakes.push(self.cake()?),
                    _ => self.skip(&e)?,
                },
                Event::End(_) => return Ok(recipes),
                Event::Eof => return Err(self.unexpected_eof()),
                _ => {}
            }
        }
    }

    fn cake(&mut self) -> Result<XmlCake> {
        let mut cake = XmlCake::default();
        loop {
            match self.next()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"name" => cake.name = self.text()?,
                    b"stovetime" => cake.stove_time = self.text()?,
                    b"ingredients" => self.ingredients(&mut cake.ingredients)?,
                    _ => self.skip(&e)?,
                },
                Event::End(_) => return Ok(cake),
                Event::Eof => return Err(self.unexpected_eof()),
                _ => {}
            }
        }
    }

    /// 重複的 `<ingredients>` 會累加到同一份清單
    fn ingredients(&mut self, ingredients: &mut XmlIngredients) -> Result<()> {
        loop {
            match self.next()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"item" => ingredients.items.push(self.item()?),
                    _ => self.skip(&e)?,
                },
                Event::End(_) => return Ok(()),
                Event::Eof => return Err(self.unexpected_eof()),
                _ => {}
            }
        }
    }

    fn item(&mut self) -> Result<XmlItem> {
        let mut item = XmlItem::default();
        loop {
            match self.next()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"itemname" => item.item_name = self.text()?,
                    b"itemcount" => item.item_count = self.text()?,
                    b"itemunit" => item.item_unit = self.text()?,
                    _ => self.skip(&e)?,
                },
                Event::End(_) => return Ok(item),
                Event::Eof => return Err(self.unexpected_eof()),
                _ => {}
            }
        }
    }

    /// Character data directly inside the current element, untrimmed.
    /// Nested elements are skipped.
    fn text(&mut self) -> Result<String> {
        let mut text = String::new();
        loop {
            match self.next()? {
                Event::Text(e) => {
                    let unescaped = e.unescape().map_err(|err| self.fail(err))?;
                    text.push_str(&unescaped);
                }
                Event::CData(e) => {
                    let raw = std::str::from_utf8(&e).map_err(|err| self.fail(err))?;
                    text.push_str(raw);
                }
                Event::Start(e) => self.skip(&e)?,
                Event::End(_) => return Ok(text),
                Event::Eof => return Err(self.unexpected_eof()),
                _ => {}
            }
        }
    }
}

pub fn to_xml_string(recipes: &XmlRecipes, indent: usize) -> Result<String> {
    let mut buffer = String::new();
    let mut serializer = quick_xml::se::Serializer::new(&mut buffer);
    serializer.indent(' ', indent);
    recipes
        .serialize(serializer)
        .map_err(|e| EtlError::XmlSerializationError {
            message: e.to_string(),
        })?;
    buffer.push('\n');
    Ok(buffer)
}

impl From<&RecipeCollection> for XmlRecipes {
    fn from(collection: &RecipeCollection) -> Self {
        let cakes = collection
            .recipes
            .iter()
            .map(|recipe| XmlCake {
                name: recipe.name.clone(),
                stove_time: recipe.bake_time.clone(),
                ingredients: XmlIngredients {
                    items: recipe
                        .ingredients
                        .iter()
                        .map(|ingredient| XmlItem {
                            item_name: ingredient.name.clone(),
                            item_count: ingredient.count.clone(),
                            item_unit: ingredient.unit.clone(),
                        })
                        .collect(),
                },
            })
            .collect();

        Self { cakes }
    }
}

impl From<&XmlRecipes> for RecipeCollection {
    fn from(recipes: &XmlRecipes) -> Self {
        let recipes = recipes
            .cakes
            .iter()
            .map(|cake| Recipe {
                name: cake.name.clone(),
                bake_time: cake.stove_time.clone(),
                ingredients: cake
                    .ingredients
                    .items
                    .iter()
                    .map(|item| Ingredient {
                        name: item.item_name.clone(),
                        count: item.item_count.clone(),
                        unit: item.item_unit.clone(),
                    })
                    .collect(),
            })
            .collect();

        RecipeCollection::new(recipes)
    }
}
