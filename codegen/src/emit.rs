use heck::ToUpperCamelCase;
use proc_macro2::{Span, TokenStream};
use quote::quote;

use crate::schema::{MessageRef, Method, Service};
use crate::GenerationError;

fn path(raw: &str) -> Result<syn::Path, GenerationError> {
    syn::parse_str(raw).map_err(|_| GenerationError::InvalidPath(raw.to_owned()))
}

fn ident(raw: &str) -> Result<syn::Ident, GenerationError> {
    Ok(syn::parse_str(raw)?)
}

/// Keywords that are valid as raw identifiers.
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "false", "final", "fn", "for", "if", "impl", "in", "let", "loop",
    "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return",
    "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use",
    "virtual", "where", "while", "yield",
];

/// A method name, written `r#type` when it collides with a keyword, as tonic does.
fn method_ident(raw: &str) -> Result<syn::Ident, GenerationError> {
    if RAW_KEYWORDS.contains(&raw) {
        return Ok(syn::Ident::new_raw(raw, Span::call_site()));
    }
    ident(raw)
}

fn message(message: &MessageRef) -> Result<Option<syn::Path>, GenerationError> {
    match message {
        MessageRef::Sentinel(_) => Ok(None),
        MessageRef::Message(raw) => path(raw).map(Some),
    }
}

/// Everything generated for one service.
pub(crate) struct Emitter<'a> {
    pub service: &'a Service,
    pub support: syn::Path,
}

impl Emitter<'_> {
    pub fn file(&self) -> Result<TokenStream, GenerationError> {
        let client = self.client()?;
        let serializer = self.serializer()?;
        let operations = self.operations()?;
        Ok(quote! {
            #client
            #serializer
            #operations
        })
    }

    fn type_name(&self, suffix: &str) -> Result<syn::Ident, GenerationError> {
        ident(&format!("{}{suffix}", self.service.name.to_upper_camel_case()))
    }

    /// Live client: every method goes through `Invoke`.
    pub fn client(&self) -> Result<TokenStream, GenerationError> {
        let support = &self.support;
        let client = self.type_name("ServiceClient")?;
        let doc = format!(
            " Typed client for the `{}` service. Every call crosses the bridge by name.",
            self.service.name
        );
        let methods = self
            .service
            .methods
            .iter()
            .map(|method| self.client_method(method))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(quote! {
            #[doc = #doc]
            #[derive(Debug, Clone)]
            pub struct #client<B> {
                bridge: B,
            }

            impl<B> #client<B> {
                pub fn new(bridge: B) -> Self {
                    Self { bridge }
                }

                pub fn bridge(&self) -> &B {
                    &self.bridge
                }
            }

            impl<B: #support::Invoke> #client<B> {
                #(#methods)*
            }
        })
    }

    fn client_method(&self, method: &Method) -> Result<TokenStream, GenerationError> {
        let support = &self.support;
        let name = method_ident(&method.rust_name)?;
        let wire = &method.wire_name;
        let doc = format!(" Invokes `{wire}`.");

        let (argument, payload) = match message(&method.request)? {
            Some(request) => (
                quote! { , request: #request },
                quote! { ::prost::Message::encode_to_vec(&request) },
            ),
            None => (quote! {}, quote! { ::std::vec::Vec::new() }),
        };

        let (output, body) = match message(&method.response)? {
            Some(response) => (
                quote! { #response },
                quote! {
                    let reply = self.bridge.invoke(#wire, payload).await?;
                    Ok(<#response as ::prost::Message>::decode(reply.as_slice())?)
                },
            ),
            None => (
                quote! { () },
                quote! {
                    self.bridge.invoke(#wire, payload).await?;
                    Ok(())
                },
            ),
        };

        Ok(quote! {
            #[doc = #doc]
            pub async fn #name(
                &self #argument
            ) -> ::std::result::Result<#output, #support::InvokeError> {
                let payload = #payload;
                #body
            }
        })
    }

    /// Pure serializer: request encoders and response decoders, no bridge.
    pub fn serializer(&self) -> Result<TokenStream, GenerationError> {
        let serializer = self.type_name("ServiceSerializer")?;
        let doc = format!(
            " Encodes requests and decodes replies of the `{}` service without a bridge.",
            self.service.name
        );

        let mut functions = Vec::new();
        for method in &self.service.methods {
            if let Some(request) = message(&method.request)? {
                let encode = ident(&format!("encode_{}", method.rust_name))?;
                functions.push(quote! {
                    pub fn #encode(request: &#request) -> ::std::vec::Vec<u8> {
                        ::prost::Message::encode_to_vec(request)
                    }
                });
            }
            if let Some(response) = message(&method.response)? {
                let decode = ident(&format!("decode_{}", method.rust_name))?;
                functions.push(quote! {
                    pub fn #decode(
                        reply: &[u8],
                    ) -> ::std::result::Result<#response, ::prost::DecodeError> {
                        <#response as ::prost::Message>::decode(reply)
                    }
                });
            }
        }

        Ok(quote! {
            #[doc = #doc]
            #[derive(Debug, Clone, Copy, Default)]
            pub struct #serializer;

            impl #serializer {
                #(#functions)*
            }
        })
    }

    /// Closed set of declared operations, plus the privileged-side dispatch.
    pub fn operations(&self) -> Result<TokenStream, GenerationError> {
        let support = &self.support;
        let operation = self.type_name("Operation")?;
        let tonic_client = path(&self.service.tonic_client_path())?;
        let count = self.service.methods.len();

        let mut variants = Vec::new();
        let mut from_name = Vec::new();
        let mut names = Vec::new();
        let mut dispatch = Vec::new();
        for method in &self.service.methods {
            let variant = ident(&method.name.to_upper_camel_case())?;
            let wire = &method.wire_name;
            let call = method_ident(&method.rust_name)?;
            let request = match message(&method.request)? {
                Some(request) => quote! { <#request as ::prost::Message>::decode(payload)? },
                None => {
                    let sentinel = path(method.request.path())?;
                    quote! { <#sentinel as ::std::default::Default>::default() }
                }
            };

            variants.push(variant.clone());
            from_name.push(quote! { #wire => ::std::option::Option::Some(Self::#variant), });
            names.push(quote! { Self::#variant => #wire, });
            dispatch.push(quote! {
                Self::#variant => {
                    let request = #request;
                    let reply = client.#call(request).await?.into_inner();
                    Ok(::prost::Message::encode_to_vec(&reply))
                }
            });
        }

        let doc = format!(
            " Operations declared by the `{}` service. Nothing else may cross the bridge.",
            self.service.name
        );

        Ok(quote! {
            #[doc = #doc]
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub enum #operation {
                #(#variants,)*
            }

            impl #operation {
                pub const ALL: [Self; #count] = [#(Self::#variants,)*];

                /// Resolves a wire name. Undeclared names resolve to nothing.
                pub fn from_name(name: &str) -> ::std::option::Option<Self> {
                    match name {
                        #(#from_name)*
                        _ => ::std::option::Option::None,
                    }
                }

                pub fn name(self) -> &'static str {
                    match self {
                        #(#names)*
                    }
                }

                /// Decodes `payload`, performs the real call and encodes the reply.
                pub async fn dispatch(
                    self,
                    client: &mut #tonic_client<::tonic::transport::Channel>,
                    payload: &[u8],
                ) -> ::std::result::Result<::std::vec::Vec<u8>, #support::InvokeError> {
                    match self {
                        #(#dispatch)*
                    }
                }
            }
        })
    }
}

/// Pretty-prints a token stream as a source file.
pub(crate) fn render(tokens: TokenStream) -> Result<String, GenerationError> {
    let file: syn::File = syn::parse2(tokens)?;
    Ok(prettyplease::unparse(&file))
}

pub(crate) fn support_path(raw: &str) -> Result<syn::Path, GenerationError> {
    path(raw)
}
