use zodgen::{Catalog, ConvertError, Converter, ConverterOptions, Field, RecordDef, TypeRef};

// ---- helpers ----

fn named(name: &str) -> TypeRef {
    TypeRef::named("app", name)
}

fn record(name: &str, fields: Vec<Field>) -> RecordDef {
    RecordDef::new("app", name, fields)
}

fn catalog(records: Vec<RecordDef>) -> Catalog {
    let mut catalog = Catalog::new();
    catalog.extend(records).unwrap();
    catalog
}

/// Expected text of one non-recursive block, `lines` without indentation.
fn block(name: &str, lines: &[&str]) -> String {
    let mut body = String::new();
    for line in lines {
        body.push_str("  ");
        body.push_str(line);
        body.push_str(",\n");
    }
    format!("export const {name}Schema = z.object({{\n{body}}})\nexport type {name} = z.infer<typeof {name}Schema>\n\n")
}

fn convert(record: RecordDef) -> String {
    let empty = Catalog::new();
    Converter::new(&empty).convert(&record).unwrap()
}

fn single(validate: &str, ty: TypeRef) -> Result<String, ConvertError> {
    let empty = Catalog::new();
    Converter::new(&empty).convert(&record("T", vec![Field::new("F", ty).validate(validate)]))
}

// ---- structure ----

#[test]
fn prefix_applies_to_schema_and_type() {
    let empty = Catalog::new();
    let user = record("User", vec![Field::new("Name", TypeRef::string())]);
    let out = zodgen::struct_to_zod_schema_with_prefix("Bot", &empty, &user).unwrap();
    assert_eq!(
        out,
        "export const BotUserSchema = z.object({\n  Name: z.string(),\n})\nexport type BotUser = z.infer<typeof BotUserSchema>\n\n"
    );
}

#[test]
fn embedded_records_merge_after_the_object() {
    let catalog = catalog(vec![
        record("HasID", vec![Field::new("ID", TypeRef::string())]),
        record("HasName", vec![Field::new("Name", TypeRef::string()).json("name")]),
    ]);
    let user = record(
        "User",
        vec![
            Field::new("HasID", named("HasID")).embedded(),
            Field::new("HasName", named("HasName")).embedded(),
            Field::new("Tags", TypeRef::slice(TypeRef::string())),
        ],
    );
    let out = zodgen::struct_to_zod_schema(&catalog, &user).unwrap();
    let expected = [
        block("HasID", &["ID: z.string()"]),
        block("HasName", &["name: z.string()"]),
        "export const UserSchema = z.object({\n  Tags: z.string().array().nullable(),\n}).merge(HasIDSchema).merge(HasNameSchema)\nexport type User = z.infer<typeof UserSchema>\n\n".to_string(),
    ]
    .concat();
    assert_eq!(out, expected);
}

#[test]
fn arrays_nest_inside_out() {
    let out = convert(record(
        "User",
        vec![
            Field::new("TagPairs", TypeRef::slice(TypeRef::array(TypeRef::string(), 2))),
            Field::new("Arr", TypeRef::array(TypeRef::array(TypeRef::array(TypeRef::string(), 30), 20), 10)),
        ],
    ));
    assert_eq!(
        out,
        block(
            "User",
            &[
                "TagPairs: z.string().array().length(2).array().nullable()",
                "Arr: z.string().array().length(30).array().length(20).array().length(10)",
            ]
        )
    );
}

#[test]
fn inline_records_expand_in_place() {
    let favourite = TypeRef::inline(vec![Field::new("Name", TypeRef::string())]);
    let out = convert(record(
        "User",
        vec![
            Field::new("Favourites", TypeRef::slice(favourite.clone())),
            Field::new("Optional", TypeRef::slice(favourite.clone())).json(",omitempty"),
            Field::new("Both", TypeRef::ptr(TypeRef::slice(favourite))).json(",omitempty"),
        ],
    ));
    assert_eq!(
        out,
        "export const UserSchema = z.object({
  Favourites: z.object({
    Name: z.string(),
  }).array().nullable(),
  Optional: z.object({
    Name: z.string(),
  }).array().optional(),
  Both: z.object({
    Name: z.string(),
  }).array().optional().nullable(),
})
export type User = z.infer<typeof UserSchema>

"
    );
}

#[test]
fn pointers_and_omitempty() {
    let out = convert(record(
        "User",
        vec![
            Field::new("Name", TypeRef::string()),
            Field::new("Nickname", TypeRef::string()).json(",omitempty"),
            Field::new("Alias", TypeRef::ptr(TypeRef::string())),
            Field::new("Handle", TypeRef::ptr(TypeRef::string())).json(",omitempty"),
            Field::new("Title", TypeRef::ptr(TypeRef::ptr(TypeRef::string()))).json(",omitempty"),
            Field::new("Tags", TypeRef::slice(TypeRef::ptr(TypeRef::string()))),
        ],
    ));
    assert_eq!(
        out,
        block(
            "User",
            &[
                "Name: z.string()",
                "Nickname: z.string().optional()",
                "Alias: z.string().nullable()",
                "Handle: z.string().optional()",
                "Title: z.string().optional().nullable()",
                "Tags: z.string().array().nullable()",
            ]
        )
    );
}

#[test]
fn nullability_interacts_with_validations() {
    let any_map = || TypeRef::map(TypeRef::string(), TypeRef::Any);
    let strings = || TypeRef::slice(TypeRef::string());
    let bounds = ".refine((val) => Object.keys(val).length >= 2, 'Map too small').refine((val) => Object.keys(val).length <= 5, 'Map too large')";
    let out = convert(record(
        "User",
        vec![
            Field::new("Name", TypeRef::string()).validate("required"),
            Field::new("PtrMapOptionalNullable1", TypeRef::ptr(any_map())).json(",omitempty"),
            Field::new("PtrMapOptionalNullable2", TypeRef::ptr(any_map()))
                .json(",omitempty")
                .validate("omitempty,min=2,max=5"),
            Field::new("PtrMap1", TypeRef::ptr(any_map())).validate("min=2,max=5"),
            Field::new("PtrMap2", TypeRef::ptr(any_map())).json(",omitempty").validate("min=2,max=5"),
            Field::new("PtrMapNullable", TypeRef::ptr(any_map())).validate("omitempty,min=2,max=5"),
            Field::new("MapOptional2", any_map()).json(",omitempty").validate("omitempty,min=2,max=5"),
            Field::new("Map1", any_map()).validate("min=2,max=5"),
            Field::new("PtrSliceOptionalNullable2", TypeRef::ptr(strings()))
                .json(",omitempty")
                .validate("omitempty,min=2,max=5"),
            Field::new("PtrSlice1", TypeRef::ptr(strings())).validate("min=2,max=5"),
            Field::new("SliceNullable", strings()).validate("omitempty,min=2,max=5"),
            Field::new("PtrIntOptional2", TypeRef::ptr(TypeRef::int()))
                .json(",omitempty")
                .validate("omitempty,min=2,max=5"),
            Field::new("PtrInt1", TypeRef::ptr(TypeRef::int())).validate("min=2,max=5"),
            Field::new("PtrIntNullable", TypeRef::ptr(TypeRef::int())).validate("omitempty,min=2,max=5"),
            Field::new("PtrString2", TypeRef::ptr(TypeRef::string()))
                .json(",omitempty")
                .validate("min=2,max=5"),
            Field::new("PtrStringNullable", TypeRef::ptr(TypeRef::string())).validate("omitempty,min=2,max=5"),
        ],
    ));
    let lines = [
        "Name: z.string().min(1)".to_string(),
        "PtrMapOptionalNullable1: z.record(z.string(), z.any()).optional().nullable()".to_string(),
        format!("PtrMapOptionalNullable2: z.record(z.string(), z.any()){bounds}.optional().nullable()"),
        format!("PtrMap1: z.record(z.string(), z.any()){bounds}"),
        format!("PtrMap2: z.record(z.string(), z.any()){bounds}"),
        format!("PtrMapNullable: z.record(z.string(), z.any()){bounds}.nullable()"),
        format!("MapOptional2: z.record(z.string(), z.any()){bounds}.optional()"),
        format!("Map1: z.record(z.string(), z.any()){bounds}"),
        "PtrSliceOptionalNullable2: z.string().array().min(2).max(5).optional().nullable()".to_string(),
        "PtrSlice1: z.string().array().min(2).max(5)".to_string(),
        "SliceNullable: z.string().array().min(2).max(5).nullable()".to_string(),
        "PtrIntOptional2: z.number().gte(2).lte(5).optional()".to_string(),
        "PtrInt1: z.number().gte(2).lte(5)".to_string(),
        "PtrIntNullable: z.number().gte(2).lte(5).nullable()".to_string(),
        "PtrString2: z.string().min(2).max(5)".to_string(),
        "PtrStringNullable: z.string().min(2).max(5).nullable()".to_string(),
    ];
    let lines = lines.iter().map(String::as_str).collect::<Vec<_>>();
    assert_eq!(out, block("User", &lines));
}

#[test]
fn slice_field_presence() {
    let ints = || TypeRef::slice(TypeRef::int());
    let out = convert(record(
        "TestSliceFieldsStruct",
        vec![
            Field::new("NoValidate", ints()),
            Field::new("Required", ints()).validate("required"),
            Field::new("Min", ints()).validate("min=1"),
            Field::new("OmitEmpty", ints()).validate("omitempty"),
            Field::new("JSONOmitEmpty", ints()).json(",omitempty"),
            Field::new("MinOmitEmpty", ints()).validate("min=1,omitempty"),
            Field::new("JSONMinOmitEmpty", ints()).json(",omitempty").validate("min=1,omitempty"),
        ],
    ));
    assert_eq!(
        out,
        block(
            "TestSliceFieldsStruct",
            &[
                "NoValidate: z.number().array().nullable()",
                "Required: z.number().array()",
                "Min: z.number().array().min(1)",
                "OmitEmpty: z.number().array().nullable()",
                "JSONOmitEmpty: z.number().array().optional()",
                "MinOmitEmpty: z.number().array().min(1).nullable()",
                "JSONMinOmitEmpty: z.number().array().min(1).optional()",
            ]
        )
    );
}

// ---- validations ----

#[test]
fn string_field_validations() {
    let s = TypeRef::string;
    assert_eq!(single("eq=hello", s()).unwrap(), block("T", &[r#"F: z.string().refine((val) => val === "hello")"#]));
    assert_eq!(
        single("oneof='a b c' 'd e f'", s()).unwrap(),
        block("T", &[r#"F: z.enum(["a b c", "d e f"] as const)"#])
    );
    assert_eq!(
        single("required,oneof=asc desc", s()).unwrap(),
        block("T", &[r#"F: z.enum(["asc", "desc"] as const)"#])
    );
    assert!(matches!(single("oneof=asc desc,max=4", s()), Err(ConvertError::InvalidValidation(_))));
    assert_eq!(single("gt=5", s()).unwrap(), block("T", &["F: z.string().min(6)"]));
    assert!(matches!(
        single("gt=18446744073709551615", s()),
        Err(ConvertError::InvalidValidation(_))
    ));
    assert_eq!(single("ipv6", s()).unwrap(), block("T", &[r#"F: z.string().ip({ version: "v6" })"#]));
    assert_eq!(
        single("boolean", s()).unwrap(),
        block("T", &[r#"F: z.enum(["true", "false"] as const)"#])
    );
    assert_eq!(single("bad=hello", s()), Err(ConvertError::UnknownValidation("bad=hello".into())));
}

#[test]
fn number_field_validations() {
    let n = TypeRef::int;
    assert_eq!(single("gte=18,lte=60", n()).unwrap(), block("T", &["F: z.number().gte(18).lte(60)"]));
    assert_eq!(single("gt=18,lt=60", n()).unwrap(), block("T", &["F: z.number().gt(18).lt(60)"]));
    assert_eq!(
        single("oneof=18 19 20", n()).unwrap(),
        block("T", &["F: z.number().refine((val) => [18, 19, 20].includes(val))"])
    );
    assert!(single("bad=18", n()).is_err());
}

#[test]
fn slice_field_validations() {
    let strings = || TypeRef::slice(TypeRef::string());
    assert_eq!(single("required", strings()).unwrap(), block("T", &["F: z.string().array()"]));
    assert_eq!(single("gt=1", strings()).unwrap(), block("T", &["F: z.string().array().min(2)"]));
    assert_eq!(single("lt=1", strings()).unwrap(), block("T", &["F: z.string().array().max(0)"]));
    assert_eq!(
        single("ne=0", strings()).unwrap(),
        block("T", &["F: z.string().array().refine((val) => val.length !== 0)"])
    );
    assert!(single("oneof=a b c", strings()).is_err());

    let nested = || TypeRef::slice(strings());
    assert_eq!(single("dive,required", nested()).unwrap(), block("T", &["F: z.string().array().array().nullable()"]));
    assert_eq!(single("required,dive,min=1", nested()).unwrap(), block("T", &["F: z.string().array().min(1).array()"]));
}

#[test]
fn map_field_validations() {
    let strings = || TypeRef::map(TypeRef::string(), TypeRef::string());
    assert_eq!(
        single("required,min=1,max=10", strings()).unwrap(),
        block(
            "T",
            &["F: z.record(z.string(), z.string()).refine((val) => Object.keys(val).length >= 1, 'Map too small').refine((val) => Object.keys(val).length <= 10, 'Map too large')"]
        )
    );
    assert_eq!(
        single("dive,min=2", strings()).unwrap(),
        block("T", &["F: z.record(z.string(), z.string().min(2)).nullable()"])
    );
    assert_eq!(
        single("required,dive,min=2,dive,min=3", TypeRef::slice(strings())).unwrap(),
        block(
            "T",
            &["F: z.record(z.string(), z.string().min(3)).refine((val) => Object.keys(val).length >= 2, 'Map too small').array()"]
        )
    );
    assert_eq!(
        single("required,dive,min=2,dive,keys,min=3,endkeys,max=4", TypeRef::slice(strings())).unwrap(),
        block(
            "T",
            &["F: z.record(z.string().min(3), z.string().max(4)).refine((val) => Object.keys(val).length >= 2, 'Map too small').array()"]
        )
    );
    assert!(single("bad=1", strings()).is_err());
}

#[test]
fn time_fields() {
    let out = convert(record(
        "User",
        vec![
            Field::new("When", TypeRef::time()),
            Field::new("Due", TypeRef::time()).validate("required"),
            Field::new("HowLong", TypeRef::scalar(zodgen::ScalarKind::Int64)),
        ],
    ));
    assert_eq!(
        out,
        block(
            "User",
            &[
                "When: z.coerce.date()",
                "Due: z.coerce.date().refine((val) => val.getTime() !== new Date('0001-01-01T00:00:00Z').getTime() && val.getTime() !== new Date(0).getTime(), 'Invalid date')",
                "HowLong: z.number()",
            ]
        )
    );
}

// ---- graph ----

#[test]
fn everything_registers_dependencies_first() {
    let catalog = catalog(vec![
        record("Post", vec![Field::new("Title", TypeRef::string()).validate("required")]),
        record(
            "PostWithMetaData",
            vec![
                Field::new("Title", TypeRef::string()).validate("required"),
                Field::new("Post", named("Post")),
            ],
        ),
    ]);
    let user = record(
        "User",
        vec![
            Field::new("Name", TypeRef::string()).validate("required"),
            Field::new("Age", TypeRef::int()).validate("required,min=18"),
            Field::new("Height", TypeRef::float64()).validate("required,min=1.5"),
            Field::new("OldPostWithMetaData", named("PostWithMetaData")).validate("required"),
            Field::new("Tags", TypeRef::slice(TypeRef::string())).validate("required,min=1"),
            Field::new("Posts", TypeRef::slice(named("Post"))).validate("required"),
            Field::new("Post", named("Post")).json(",omitempty"),
            Field::new("PostOptional", TypeRef::ptr(named("Post"))).json(",omitempty"),
            Field::new("PostOptionalNullable", TypeRef::ptr(TypeRef::ptr(named("Post")))).json(",omitempty"),
            Field::new("ExtendedProps", TypeRef::Any),
            Field::new("ExtendedPropsOptional", TypeRef::Any).json(",omitempty"),
            Field::new(
                "ExtendedPropsVeryIndirect",
                TypeRef::ptr(TypeRef::ptr(TypeRef::ptr(TypeRef::ptr(TypeRef::Any)))),
            ),
            Field::new("MapWithStruct", TypeRef::map(TypeRef::string(), named("PostWithMetaData"))),
        ],
    );
    let out = Converter::new(&catalog).convert(&user).unwrap();
    let expected = [
        block("Post", &["Title: z.string().min(1)"]),
        block("PostWithMetaData", &["Title: z.string().min(1)", "Post: PostSchema"]),
        block(
            "User",
            &[
                "Name: z.string().min(1)",
                "Age: z.number().gte(18).refine((val) => val !== 0)",
                "Height: z.number().gte(1.5).refine((val) => val !== 0)",
                "OldPostWithMetaData: PostWithMetaDataSchema",
                "Tags: z.string().array().min(1)",
                "Posts: PostSchema.array()",
                "Post: PostSchema",
                "PostOptional: PostSchema.optional()",
                "PostOptionalNullable: PostSchema.optional().nullable()",
                "ExtendedProps: z.any()",
                "ExtendedPropsOptional: z.any()",
                "ExtendedPropsVeryIndirect: z.any()",
                "MapWithStruct: z.record(z.string(), PostWithMetaDataSchema).nullable()",
            ],
        ),
    ]
    .concat();
    assert_eq!(out, expected);
}

#[test]
fn convert_slice_shares_dependencies() {
    let catalog = catalog(vec![
        record(
            "Foo",
            vec![
                Field::new("Bar", TypeRef::string()),
                Field::new("Baz", TypeRef::string()),
                Field::new("Quz", TypeRef::string()),
            ],
        ),
        record("Zip", vec![Field::new("Zap", TypeRef::ptr(named("Foo")))]),
        record("Whim", vec![Field::new("Wham", TypeRef::ptr(named("Foo")))]),
    ]);
    let roots = [catalog.find("app.Zip").unwrap(), catalog.find("app.Whim").unwrap()];
    let out = Converter::new(&catalog).convert_slice(&roots).unwrap();
    let expected = [
        block("Foo", &["Bar: z.string()", "Baz: z.string()", "Quz: z.string()"]),
        block("Zip", &["Zap: FooSchema.nullable()"]),
        block("Whim", &["Wham: FooSchema.nullable()"]),
    ]
    .concat();
    assert_eq!(out, expected);
}

#[test]
fn recursive_record_gets_explicit_type() {
    let item = record(
        "NestedItem",
        vec![
            Field::new("ID", TypeRef::int()).json("id"),
            Field::new("Title", TypeRef::string()).json("title"),
            Field::new("ParentID", TypeRef::int()).json("parent_id"),
            Field::new("Children", TypeRef::slice(TypeRef::ptr(named("NestedItem")))).json("children"),
        ],
    );
    let catalog = catalog(vec![item.clone()]);
    let out = Converter::new(&catalog).convert(&item).unwrap();
    assert_eq!(
        out,
        "export type NestedItem = {
  id: number,
  title: string,
  parent_id: number,
  children: NestedItem[] | null,
}
export const NestedItemSchema: z.ZodType<NestedItem> = z.object({
  id: z.number(),
  title: z.string(),
  parent_id: z.number(),
  children: z.lazy(() => NestedItemSchema).array().nullable(),
})

"
    );
}

#[test]
fn recursive_dependency_precedes_its_user() {
    let catalog = catalog(vec![record(
        "Node",
        vec![
            Field::new("Value", TypeRef::int()).json("value"),
            Field::new("Next", TypeRef::ptr(named("Node"))).json("next"),
        ],
    )]);
    let parent = record("Parent", vec![Field::new("Child", TypeRef::ptr(named("Node"))).json("child")]);
    let out = Converter::new(&catalog).convert(&parent).unwrap();
    assert_eq!(
        out,
        "export type Node = {
  value: number,
  next: Node | null,
}
export const NodeSchema: z.ZodType<Node> = z.object({
  value: z.number(),
  next: z.lazy(() => NodeSchema).nullable(),
})

export const ParentSchema = z.object({
  child: NodeSchema.nullable(),
})
export type Parent = z.infer<typeof ParentSchema>

"
    );
}

#[test]
fn mutual_recursion_is_rejected() {
    let catalog = catalog(vec![
        record("TestCyclicA", vec![Field::new("B", TypeRef::ptr(named("TestCyclicB")))]),
        record("TestCyclicB", vec![Field::new("A", TypeRef::ptr(named("TestCyclicA")))]),
    ]);
    let mut converter = Converter::new(&catalog);
    let err = converter.add_type(catalog.find("app.TestCyclicA").unwrap()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "circular dependency detected: TestCyclicA → TestCyclicB → TestCyclicA"
    );
    assert_eq!(converter.export(), "");
}

#[test]
fn failed_registration_leaves_earlier_entries_intact() {
    let catalog = catalog(vec![
        record("Ok", vec![Field::new("N", TypeRef::int())]),
        record("Dep", vec![Field::new("N", TypeRef::int())]),
        record(
            "Broken",
            vec![Field::new("Dep", named("Dep")), Field::new("S", TypeRef::string()).validate("bad=1")],
        ),
    ]);
    let mut converter = Converter::new(&catalog);
    converter.add_type(catalog.find("app.Ok").unwrap()).unwrap();
    assert!(converter.add_type(catalog.find("app.Broken").unwrap()).is_err());
    assert_eq!(converter.export(), block("Ok", &["N: z.number()"]));
}

#[test]
fn generic_instantiations_are_distinct_records() {
    let pair = |args: Vec<TypeRef>, first: TypeRef, second: TypeRef| {
        RecordDef::new(
            "app",
            "GenericPair",
            vec![Field::new("First", first), Field::new("Second", second)],
        )
        .with_args(args)
    };
    let string_int = record(
        "StringIntPair",
        vec![Field::new("First", TypeRef::string()), Field::new("Second", TypeRef::int())],
    );
    let int_bool = pair(vec![TypeRef::int(), TypeRef::bool()], TypeRef::int(), TypeRef::bool());
    let pair_map = RecordDef::new(
        "app",
        "PairMap",
        vec![Field::new(
            "Items",
            TypeRef::map(
                TypeRef::string(),
                TypeRef::generic("app", "GenericPair", vec![TypeRef::int(), TypeRef::bool()]),
            ),
        )
        .json("items")],
    )
    .with_args(vec![TypeRef::string(), TypeRef::int(), TypeRef::bool()]);
    let catalog = catalog(vec![string_int.clone(), int_bool.clone(), pair_map.clone()]);

    let mut converter = Converter::new(&catalog);
    converter.add_type(&string_int).unwrap();
    converter.add_type(&int_bool).unwrap();
    converter.add_type(&pair_map).unwrap();
    converter.add_type(&int_bool).unwrap();
    assert_eq!(converter.entries().count(), 3);
    let expected = [
        block("StringIntPair", &["First: z.string()", "Second: z.number()"]),
        block("GenericPairIntBool", &["First: z.number()", "Second: z.boolean()"]),
        block("PairMapStringIntBool", &["items: z.record(z.string(), GenericPairIntBoolSchema).nullable()"]),
    ]
    .concat();
    assert_eq!(converter.export(), expected);
}

// ---- extension points ----

#[test]
fn custom_type_takes_over_the_field() {
    let empty = Catalog::new();
    let options = ConverterOptions::new()
        .with_custom_type("github.com/hypersequent/zen.Decimal", |_, _, _, _| Ok("z.string()".to_string()));
    let user = record(
        "User",
        vec![
            Field::new("Name", TypeRef::string()),
            Field::new("Money", TypeRef::named("github.com/hypersequent/zen", "Decimal")),
            Field::new("Maybe", TypeRef::ptr(TypeRef::named("github.com/hypersequent/zen", "Decimal"))),
        ],
    );
    let out = Converter::with_options(&empty, options).convert(&user).unwrap();
    assert_eq!(
        out,
        block("User", &["Name: z.string()", "Money: z.string()", "Maybe: z.string().nullable()"])
    );
}

#[test]
fn custom_tags_apply_to_any_host() {
    let catalog = catalog(vec![record(
        "SortParams",
        vec![
            Field::new("Order", TypeRef::ptr(TypeRef::string()))
                .json("order,omitempty")
                .validate("omitempty,oneof=asc desc"),
            Field::new("Field", TypeRef::ptr(TypeRef::string())).json("field,omitempty"),
        ],
    )]);
    let pagination = TypeRef::inline(vec![
        Field::new("Start", TypeRef::ptr(TypeRef::int()))
            .json("start,omitempty")
            .validate("omitempty,gt=0"),
        Field::new("End", TypeRef::ptr(TypeRef::int()))
            .json("end,omitempty")
            .validate("omitempty,gt=0"),
    ]);
    let request = record(
        "Request",
        vec![
            Field::new("SortParams", named("SortParams"))
                .embedded()
                .validate("sortFields=title address age dob"),
            Field::new("PaginationParams", pagination).validate("pageParams"),
            Field::new("Search", TypeRef::ptr(TypeRef::string()))
                .json("search,omitempty")
                .validate("identifier"),
        ],
    );
    let options = ConverterOptions::new()
        .with_custom_tag("identifier", |_, _, _, _| {
            Ok(".refine((val) => !val || /^[a-z0-9_]*$/.test(val), 'Invalid search identifier')".to_string())
        })
        .with_custom_tag("pageParams", |_, _, _, _| {
            Ok(".refine((val) => !val.start || !val.end || val.start < val.end, 'Start should be less than end')".to_string())
        })
        .with_custom_tag("sortFields", |_, _, value, _| {
            let fields = value.split(' ').map(|f| format!("'{f}'")).collect::<Vec<_>>();
            Ok(format!(".extend({{field: z.enum([{}])}})", fields.join(", ")))
        });

    let out = Converter::with_options(&catalog, options).convert(&request).unwrap();
    assert_eq!(
        out,
        r#"export const SortParamsSchema = z.object({
  order: z.enum(["asc", "desc"] as const).optional(),
  field: z.string().optional(),
})
export type SortParams = z.infer<typeof SortParamsSchema>

export const RequestSchema = z.object({
  PaginationParams: z.object({
    start: z.number().gt(0).optional(),
    end: z.number().gt(0).optional(),
  }).refine((val) => !val.start || !val.end || val.start < val.end, 'Start should be less than end'),
  search: z.string().refine((val) => !val || /^[a-z0-9_]*$/.test(val), 'Invalid search identifier').optional(),
}).merge(SortParamsSchema.extend({field: z.enum(['title', 'address', 'age', 'dob'])}))
export type Request = z.infer<typeof RequestSchema>

"#
    );
}

#[test]
fn custom_type_handlers_can_recurse() {
    let catalog = catalog(vec![record("Inner", vec![Field::new("N", TypeRef::int())])]);
    let options = ConverterOptions::new().with_custom_type("app.Box", |c, ty, validate, indent| {
        let TypeRef::Named(named) = ty else {
            unreachable!("handlers are keyed by named types")
        };
        Ok(format!("{}.array().max(1)", c.convert_type(&named.args[0], validate, indent)?))
    });
    let outer = record(
        "Outer",
        vec![Field::new("Boxed", TypeRef::generic("app", "Box", vec![named("Inner")]))],
    );
    let out = Converter::with_options(&catalog, options).convert(&outer).unwrap();
    let expected = [
        block("Inner", &["N: z.number()"]),
        block("Outer", &["Boxed: InnerSchema.array().max(1)"]),
    ]
    .concat();
    assert_eq!(out, expected);
}

#[test]
fn descriptors_round_trip_through_the_catalog() {
    let src = r#"{"records": [
        {"package": "app", "name": "Tag", "fields": [
            {"ident": "Label", "type": {"kind": "scalar", "scalar": "string"}, "json": "label", "validate": "required,max=32"}
        ]},
        {"package": "app", "name": "Post", "fields": [
            {"ident": "Tags", "type": {"kind": "slice", "elem": {"kind": "named", "package": "app", "name": "Tag"}}, "json": "tags,omitempty"},
            {"ident": "Published", "type": {"kind": "pointer", "elem": {"kind": "named", "package": "time", "name": "Time"}}, "json": "published"}
        ]}
    ]}"#;
    let catalog = Catalog::from_json_str(src).unwrap();
    let out = Converter::new(&catalog)
        .convert(catalog.find("app.Post").unwrap())
        .unwrap();
    let expected = [
        block("Tag", &["label: z.string().min(1).max(32)"]),
        block("Post", &["tags: TagSchema.array().optional()", "published: z.coerce.date().nullable()"]),
    ]
    .concat();
    assert_eq!(out, expected);
}
